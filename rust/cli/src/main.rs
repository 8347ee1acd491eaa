use std::process::ExitCode;

fn main() -> ExitCode {
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let code = lowdraw_cli::run(std::env::args(), &mut out, &mut err);
    ExitCode::from(code as u8)
}
