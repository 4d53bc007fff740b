use anyhow::Result;
use catezile_core::config::SiteConfig;
use owo_colors::OwoColorize;

pub fn run(config: &SiteConfig, init: bool) -> Result<()> {
    let config_path = SiteConfig::config_path()?;

    if init {
        if config_path.exists() {
            anyhow::bail!("Config already exists at {}", config_path.display());
        }
        SiteConfig::create_default_config(&config_path)?;
        println!("{}", format!("  Created: {}", config_path.display()).green());
        return Ok(());
    }

    let exists = if config_path.exists() { "" } else { " (not created, using defaults)" };
    println!("{}", "Paths".bold());
    println!("  Config:  {}{}", config_path.display(), exists.dimmed());
    println!();
    println!("{}", "Settings".bold());
    println!("  timezone:             {}", config.timezone);
    println!("  locale:               {}", config.locale);
    println!("  site_url:             {}", config.site_url);
    println!("  product_id:           {}", config.product_id);
    println!("  uid_domain:           {}", config.uid_domain);
    println!("  live_window_minutes:  {}", config.live_window_minutes);

    Ok(())
}
