use labelnet::{FontSpec, PrintJob, SessionResult, WidthClass};
use std::env;
use std::time::Duration;

//
// LABELNET_PRINTER=192.168.54.148:9100 LABELNET_FONT=/path/to/font.ttf \
//   cargo run --example print_text "HELLO"
//
fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let text = env::args().nth(1).unwrap_or_else(|| "HELLO".to_string());

    let endpoint = env::var("LABELNET_PRINTER")
        .unwrap_or_else(|_| "192.168.54.148:9100".to_string())
        .parse()
        .expect("LABELNET_PRINTER must be host:port");

    let font_path = env::var("LABELNET_FONT")
        .unwrap_or_else(|_| "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string());
    let font_bytes = std::fs::read(&font_path).expect("could not read font file");
    let font = FontSpec::from_bytes(font_bytes, 40.0).expect("could not parse font file");

    let job = PrintJob::new(endpoint, WidthClass::W12)
        .timeout(Duration::from_secs(5))
        .transport_retries(1);

    match job.print(&text, &font) {
        Ok(SessionResult::Acknowledged) => println!("label printed"),
        Ok(SessionResult::Rejected(fault)) => println!("printer refused: {}", fault),
        Ok(SessionResult::TransportFailure(fault)) => println!("no confirmation: {}", fault),
        Err(err) => println!("ERROR {:#?}", err),
    }
}
