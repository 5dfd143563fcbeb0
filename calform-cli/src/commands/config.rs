use anyhow::Result;
use calform_core::config::CalFormConfig;
use owo_colors::OwoColorize;

pub fn run(config: &CalFormConfig) -> Result<()> {
    let config_path = CalFormConfig::config_path().map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Exports:    {}", config.output_dir().display());

    let time_zone = match config.time_zone {
        Some(ref tz) => tz.clone(),
        None => format!("{} {}", super::system_time_zone(), "(system)".dimmed()),
    };
    let calendar_name = config.calendar_name.as_deref().unwrap_or("(none)");
    let alarm = match config.default_alarm_minutes {
        Some(minutes) => format!("{minutes} min before"),
        None => "(none)".to_string(),
    };

    println!();
    println!("{}", "Defaults".bold());
    println!("  Time zone:  {}", time_zone);
    println!("  Calendar:   {}", calendar_name);
    println!("  Format:     {}", config.default_format);
    println!("  Alarm:      {}", alarm);

    Ok(())
}
