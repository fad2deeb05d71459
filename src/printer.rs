//! Transport session with the printer.
//!
//! One session sends one packed bitmap as one request frame over TCP and
//! reads one fixed-size status response. The connection is scoped to the
//! exchange and released on every exit path, including timeouts.
//!
//! Frame layout (device firmware contract; the byte values live in the
//! constants below so confirming them against the hardware touches
//! nothing else):
//!
//! ```text
//! request:  1B 52 | width code | payload len u32 LE | payload | xor | 1A
//! response: 80 | status | detail lo | detail hi
//! ```
//!
//! Status 0x00 acknowledges the print; anything else is a reject code
//! decoded by [`DeviceFault::from_code`].

use log::{debug, info};
use std::fmt;
use std::io::{Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    bitmap::PackedBitmap,
    error::{DeviceFault, TransportFault},
    label::LabelSpec,
};

const CMD_ESC: u8 = 0x1B;
const CMD_PRINT_RASTER: u8 = 0x52;
const FRAME_TERMINATOR: u8 = 0x1A;
const STATUS_MARKER: u8 = 0x80;
const RESPONSE_LEN: usize = 4;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The printer is one physical device with one label feed; concurrent
/// sessions must not interleave frames on the wire.
static SEND_GATE: Mutex<()> = Mutex::new(());

/// Network address of a printer.
///
/// Always an explicit value handed to the session, never a process-wide
/// constant, so multiple devices (or a future discovery collaborator)
/// need no changes here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterEndpoint {
    pub host: IpAddr,
    pub port: u16,
}

impl PrinterEndpoint {
    pub fn new(host: IpAddr, port: u16) -> Self {
        PrinterEndpoint { host, port }
    }

    fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl From<SocketAddr> for PrinterEndpoint {
    fn from(addr: SocketAddr) -> Self {
        PrinterEndpoint::new(addr.ip(), addr.port())
    }
}

impl FromStr for PrinterEndpoint {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocketAddr::from_str(s).map(PrinterEndpoint::from)
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outcome of one transmission attempt.
#[derive(Debug)]
pub enum SessionResult {
    /// The device accepted the bitmap and is printing. Irreversible;
    /// never re-send a frame that was acknowledged.
    Acknowledged,
    /// The device parsed the frame and refused it.
    Rejected(DeviceFault),
    /// The frame may or may not have arrived; nothing was confirmed.
    TransportFailure(TransportFault),
}

/// A single-shot connection to one printer.
pub struct PrinterSession {
    endpoint: PrinterEndpoint,
    timeout: Duration,
}

impl PrinterSession {
    pub fn new(endpoint: PrinterEndpoint) -> Self {
        PrinterSession {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Deadline applied to the connection attempt, the frame write and
    /// the response wait, each.
    pub fn timeout(self, timeout: Duration) -> Self {
        PrinterSession { timeout, ..self }
    }

    /// Send `bitmap` to the device and wait for its status reply.
    ///
    /// Exactly one attempt is made; retry policy belongs to the caller
    /// and must stay explicit and bounded, since every accepted frame
    /// feeds physical label stock.
    pub fn send(&self, bitmap: &PackedBitmap, label: &LabelSpec) -> SessionResult {
        let frame = encode_frame(bitmap, label);

        let _gate = SEND_GATE.lock().unwrap_or_else(|e| e.into_inner());

        debug!(
            "sending {} byte frame ({} byte payload) to {}",
            frame.len(),
            bitmap.len(),
            self.endpoint
        );

        match self.exchange(&frame) {
            Ok((0x00, _)) => {
                info!("printer at {} acknowledged the job", self.endpoint);
                SessionResult::Acknowledged
            }
            Ok((code, detail)) => {
                let fault = DeviceFault::from_code(code);
                debug!("printer rejected job: {:?} (detail {:02X?})", fault, detail);
                SessionResult::Rejected(fault)
            }
            Err(fault) => {
                debug!("transport failure talking to {}: {}", self.endpoint, fault);
                SessionResult::TransportFailure(fault)
            }
        }
    }

    /// One request/response round trip. The stream is dropped (and the
    /// connection with it) on every path out of this function.
    fn exchange(&self, frame: &[u8]) -> Result<(u8, [u8; 2]), TransportFault> {
        let mut stream = TcpStream::connect_timeout(&self.endpoint.socket_addr(), self.timeout)
            .map_err(classify_io)?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.set_read_timeout(Some(self.timeout))?;

        stream.write_all(frame).map_err(classify_io)?;
        stream.flush().map_err(classify_io)?;

        let mut response = [0u8; RESPONSE_LEN];
        let mut filled = 0;
        while filled < RESPONSE_LEN {
            match stream.read(&mut response[filled..]) {
                Ok(0) => return Err(TransportFault::ShortResponse(filled)),
                Ok(n) => filled += n,
                Err(e) => return Err(classify_io(e)),
            }
        }

        if response[0] != STATUS_MARKER {
            return Err(TransportFault::BadHeader(response[0]));
        }
        Ok((response[1], [response[2], response[3]]))
    }
}

/// Build the request frame for one packed bitmap.
fn encode_frame(bitmap: &PackedBitmap, label: &LabelSpec) -> Vec<u8> {
    let payload = bitmap.bytes();
    let mut frame = Vec::with_capacity(payload.len() + 9);
    frame.push(CMD_ESC);
    frame.push(CMD_PRINT_RASTER);
    frame.push(label.width_class().code());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(payload);
    frame.push(xor_checksum(payload));
    frame.push(FRAME_TERMINATOR);
    frame
}

/// Trailer checksum: XOR over the payload bytes, catches truncation.
fn xor_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, b| acc ^ b)
}

fn classify_io(e: std::io::Error) -> TransportFault {
    match e.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => TransportFault::Timeout,
        _ => TransportFault::Io(e),
    }
}
