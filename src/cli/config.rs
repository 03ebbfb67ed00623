use crate::core::settings::Settings;
use anyhow::Result;

pub fn run(json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let path = Settings::config_path();

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    match &path {
        Some(p) if p.exists() => println!("# {}", p.display()),
        Some(p) => println!("# {} (not found, using defaults)", p.display()),
        None => println!("# no config directory, using defaults"),
    }
    print!("{}", toml::to_string_pretty(&settings)?);

    Ok(())
}
