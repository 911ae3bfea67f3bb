use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let code = s3_relay::cli::run(std::env::args_os(), &mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}
