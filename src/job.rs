//! Print job orchestration: render, pack, send.

use log::warn;
use std::time::Duration;

use crate::{
    bitmap,
    error::Error,
    label::{LabelSpec, WidthClass},
    printer::{PrinterEndpoint, PrinterSession, SessionResult},
    raster::{self, TextShaper},
};

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// One-shot print pipeline for a single printer.
///
/// Runs rasterization and packing first and only touches the network
/// once a valid payload exists; a frame is never built from bad input.
///
/// # Example
///
/// ```rust,no_run
/// use labelnet::{FontSpec, PrintJob, WidthClass};
///
/// let font = FontSpec::from_bytes(std::fs::read("label.ttf").unwrap(), 40.0).unwrap();
/// let job = PrintJob::new("192.168.54.148:9100".parse().unwrap(), WidthClass::W12);
/// let outcome = job.print("HELLO", &font).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PrintJob {
    endpoint: PrinterEndpoint,
    width_class: WidthClass,
    timeout: Option<Duration>,
    transport_retries: u32,
}

impl PrintJob {
    pub fn new(endpoint: PrinterEndpoint, width_class: WidthClass) -> Self {
        PrintJob {
            endpoint,
            width_class,
            timeout: None,
            transport_retries: 0,
        }
    }

    /// Deadline for the connection attempt and the response wait.
    pub fn timeout(self, timeout: Duration) -> Self {
        PrintJob {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Resend after a transport failure at most `retries` extra times.
    ///
    /// Only transport failures are retried. A `Rejected` outcome never
    /// is: the device saw the frame and said no, and re-feeding it
    /// wastes label stock. Defaults to 0.
    pub fn transport_retries(self, retries: u32) -> Self {
        PrintJob {
            transport_retries: retries,
            ..self
        }
    }

    /// Render `text` with `shaper` and transmit it to the printer.
    ///
    /// Input and encoding failures come back as `Err` before any socket
    /// is opened; device and transport outcomes come back in the
    /// [`SessionResult`].
    pub fn print(&self, text: &str, shaper: &impl TextShaper) -> Result<SessionResult, Error> {
        let label = LabelSpec::new(self.width_class);
        let raster = raster::render(text, shaper, &label)?;
        let packed = bitmap::pack(&raster)?;

        let mut session = PrinterSession::new(self.endpoint);
        if let Some(timeout) = self.timeout {
            session = session.timeout(timeout);
        }

        let mut attempts_left = self.transport_retries;
        loop {
            match session.send(&packed, &label) {
                SessionResult::TransportFailure(fault) if attempts_left > 0 => {
                    attempts_left -= 1;
                    warn!(
                        "transport failure ({}), retrying ({} attempt(s) left)",
                        fault, attempts_left
                    );
                    std::thread::sleep(RETRY_BACKOFF);
                }
                outcome => return Ok(outcome),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceFault;
    use crate::raster::test_shapers::{BoxShaper, UnresolvableShaper};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    /// Mock device that counts connections, reads a whole request (up to
    /// the terminator) and answers with `status`.
    fn mock_device(
        status: u8,
    ) -> (
        PrinterEndpoint,
        Arc<AtomicUsize>,
        thread::JoinHandle<Vec<u8>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = PrinterEndpoint::from(listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            // Length field at offset 3 sizes the rest of the frame.
            let mut header = [0u8; 7];
            stream.read_exact(&mut header).unwrap();
            let payload_len =
                u32::from_le_bytes([header[3], header[4], header[5], header[6]]) as usize;
            let mut rest = vec![0u8; payload_len + 2];
            stream.read_exact(&mut rest).unwrap();
            stream.write_all(&[0x80, status, 0x00, 0x00]).unwrap();

            let mut request = header.to_vec();
            request.extend_from_slice(&rest);
            request
        });
        (endpoint, connections, handle)
    }

    #[test]
    fn hello_prints_end_to_end() {
        let (endpoint, _, device) = mock_device(0x00);

        let job = PrintJob::new(endpoint, WidthClass::W12);
        let outcome = job.print("HELLO", &BoxShaper).unwrap();
        assert!(matches!(outcome, SessionResult::Acknowledged));

        // Five 6-dot box glyphs end at column 29, so the raster is 32
        // wide and the payload (32 / 8) * 48 bytes.
        let request = device.join().unwrap();
        let payload_len = u32::from_le_bytes([request[3], request[4], request[5], request[6]]);
        assert_eq!(payload_len, (32 / 8) * 48);
    }

    #[test]
    fn device_reject_surfaces_verbatim() {
        let (endpoint, _, device) = mock_device(0x02);

        let job = PrintJob::new(endpoint, WidthClass::W12);
        let outcome = job.print("HELLO", &BoxShaper).unwrap();
        assert!(matches!(
            outcome,
            SessionResult::Rejected(DeviceFault::LabelJam)
        ));
        device.join().unwrap();
    }

    #[test]
    fn empty_text_short_circuits_before_any_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = PrinterEndpoint::from(listener.local_addr().unwrap());
        listener.set_nonblocking(true).unwrap();

        let job = PrintJob::new(endpoint, WidthClass::W12);
        assert!(matches!(
            job.print("   ", &BoxShaper),
            Err(Error::EmptyText)
        ));

        // Nothing ever dialed the listener.
        assert!(listener.accept().is_err());
    }

    #[test]
    fn unresolvable_font_short_circuits_before_any_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = PrinterEndpoint::from(listener.local_addr().unwrap());
        listener.set_nonblocking(true).unwrap();

        let job = PrintJob::new(endpoint, WidthClass::W12);
        assert!(matches!(
            job.print("HELLO", &UnresolvableShaper),
            Err(Error::FontUnavailable)
        ));
        assert!(listener.accept().is_err());
    }

    #[test]
    fn rejected_outcome_is_never_retried() {
        let (endpoint, connections, device) = mock_device(0x01);

        let job = PrintJob::new(endpoint, WidthClass::W12).transport_retries(3);
        let outcome = job.print("HELLO", &BoxShaper).unwrap();
        assert!(matches!(outcome, SessionResult::Rejected(DeviceFault::Busy)));
        device.join().unwrap();
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bounded_retry_recovers_from_one_transport_failure() {
        // First dial hits a dead port; the device only comes up during
        // the retry backoff, so success proves exactly one retry ran.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let endpoint = PrinterEndpoint::from(addr);
        drop(listener);

        let device = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            let listener = TcpListener::bind(addr).unwrap();
            let (mut stream, _) = listener.accept().unwrap();
            let mut header = [0u8; 7];
            stream.read_exact(&mut header).unwrap();
            let payload_len =
                u32::from_le_bytes([header[3], header[4], header[5], header[6]]) as usize;
            let mut rest = vec![0u8; payload_len + 2];
            stream.read_exact(&mut rest).unwrap();
            stream.write_all(&[0x80, 0x00, 0x00, 0x00]).unwrap();
        });

        let job = PrintJob::new(endpoint, WidthClass::W12)
            .timeout(Duration::from_millis(200))
            .transport_retries(1);
        let outcome = job.print("HI", &BoxShaper).unwrap();
        assert!(matches!(outcome, SessionResult::Acknowledged));
        device.join().unwrap();
    }
}
