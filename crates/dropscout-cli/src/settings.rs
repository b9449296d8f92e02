//! Filter threshold management.
//!
//! `set` reads the stored thresholds, applies only the flags the user
//! passed, and writes the result back; the db boundary validates before
//! anything is persisted, so an out-of-range value leaves the stored
//! settings untouched.

use clap::Args;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use dropscout_core::FilterSettings;

/// Threshold overrides; unset flags keep their stored values.
#[derive(Debug, Args)]
pub(crate) struct Overrides {
    /// Highest acceptable supplier cost.
    #[arg(long)]
    max_source_cost: Option<Decimal>,
    /// Lowest acceptable selling price.
    #[arg(long)]
    min_sell_price: Option<Decimal>,
    /// Lowest acceptable margin, in percent (0-100).
    #[arg(long)]
    min_margin_percent: Option<Decimal>,
    /// Highest acceptable count of active Facebook ads.
    #[arg(long)]
    max_fb_ads: Option<u32>,
    /// Longest acceptable shipping time, in days.
    #[arg(long)]
    max_shipping_days: Option<u32>,
    /// Whether trademark-risk products are rejected outright.
    #[arg(long)]
    exclude_trademark_risk: Option<bool>,
}

impl Overrides {
    fn apply(self, base: FilterSettings) -> FilterSettings {
        FilterSettings {
            max_source_cost: self.max_source_cost.unwrap_or(base.max_source_cost),
            min_sell_price: self.min_sell_price.unwrap_or(base.min_sell_price),
            min_margin_percent: self.min_margin_percent.unwrap_or(base.min_margin_percent),
            max_fb_ads: self.max_fb_ads.unwrap_or(base.max_fb_ads),
            max_shipping_days: self.max_shipping_days.unwrap_or(base.max_shipping_days),
            exclude_trademark_risk: self
                .exclude_trademark_risk
                .unwrap_or(base.exclude_trademark_risk),
        }
    }
}

pub(crate) async fn show(pool: &PgPool, user: Uuid) -> anyhow::Result<()> {
    let settings = dropscout_db::get_filter_settings(pool, user).await?;
    print_settings(&settings);
    Ok(())
}

pub(crate) async fn set(pool: &PgPool, user: Uuid, overrides: Overrides) -> anyhow::Result<()> {
    let current = dropscout_db::get_filter_settings(pool, user).await?;
    let updated = overrides.apply(current);
    dropscout_db::update_filter_settings(pool, user, &updated).await?;

    println!("settings updated");
    print_settings(&updated);
    Ok(())
}

fn print_settings(settings: &FilterSettings) {
    println!("  max source cost:        {}", settings.max_source_cost);
    println!("  min sell price:         {}", settings.min_sell_price);
    println!("  min margin percent:     {}", settings.min_margin_percent);
    println!("  max fb ads:             {}", settings.max_fb_ads);
    println!("  max shipping days:      {}", settings.max_shipping_days);
    println!(
        "  exclude trademark risk: {}",
        settings.exclude_trademark_risk
    );
}
