use itertools::Itertools;
use scoreq::{run, Config, Error};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = env::args().collect_vec();
    let Some(config_file) = args.get(1) else {
        let bin = args.first().map_or("scoreq", String::as_str);
        return Err(anyhow::anyhow!("usage: {bin} <config.toml>").into());
    };
    let config = Config::load(&PathBuf::from(config_file))?;
    let report = run(&config)?;
    let out = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
    println!("{out}");
    Ok(())
}
