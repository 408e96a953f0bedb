use colored::Colorize as _;
use fschurn::{
    application::{Application, COMPLETION_MESSAGE},
    cli::Cli,
};
use supports_color::Stream;
use tracing::debug;

fn main() {
    let cli_args = Cli::parse_args();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args);

    if supports_color::on(Stream::Stdout).is_some() {
        println!("{}", COMPLETION_MESSAGE.green());
    } else {
        println!("{COMPLETION_MESSAGE}");
    }
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
