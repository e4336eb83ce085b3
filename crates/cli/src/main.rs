fn main() -> anyhow::Result<()> {
    stockcast_observability::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let request = match stockcast_cli::Request::parse(&args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{e}\n\n{}", stockcast_cli::USAGE);
            std::process::exit(2);
        }
    };

    let report = stockcast_cli::run(&request, stockcast_session::SessionConfig::from_env())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
