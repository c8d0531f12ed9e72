use anyhow::{Context, Result, bail};
use skinamp::{Config, app_core::Skinamp};

fn main() -> Result<()> {
    unsafe { std::env::set_var("RUST_BACKTRACE", "1") };

    if let Err(e) = skinamp::init_logging() {
        eprintln!("Logging disabled: {e:#}");
    }

    let (config_path, file) = parse_args(std::env::args().skip(1))?;

    let config = match config_path {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::load()?,
    };

    let mut app = Skinamp::new(&config).context("Could not start the player")?;
    if let Some(file) = file {
        app.open(&file);
    }

    app.run()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Option<String>, Option<String>)> {
    let mut config = None;
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config = Some(path),
                None => bail!("--config needs a path"),
            },
            _ if file.is_none() => file = Some(arg),
            _ => bail!("Unexpected argument: {arg}"),
        }
    }

    Ok((config, file))
}
