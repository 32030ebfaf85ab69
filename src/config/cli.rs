use crate::config::toml_config::WidgetConfig;
use crate::domain::model::ProductId;
use crate::utils::error::{Result, WidgetError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A companion to check, optionally with its size: `ID` or `ID:SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub product_id: ProductId,
    pub size: Option<String>,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (id, size) = match s.split_once(':') {
            Some((id, size)) => (id, Some(size.to_string())),
            None => (s, None),
        };
        let product_id = id
            .trim()
            .parse::<ProductId>()
            .map_err(|e| format!("invalid product id '{}': {}", id, e))?;
        Ok(Self {
            product_id,
            size: size.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "companion-cart")]
#[command(about = "Pick frequently-bought-together items and add them to the bag")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Shop API base URL (overrides the config file)
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Value of the auth_token cookie (overrides the config file)
    #[arg(long)]
    pub auth_token: Option<String>,

    #[arg(long)]
    pub product_id: ProductId,

    /// Price of the product being viewed
    #[arg(long)]
    pub price: Decimal,

    /// Size of the product being viewed
    #[arg(long)]
    pub size: String,

    /// Maximum number of recommendations to fetch
    #[arg(long)]
    pub limit: Option<usize>,

    /// Companion to include, as ID or ID:SIZE (repeatable)
    #[arg(long = "select")]
    pub selections: Vec<Selection>,

    /// Add the selected items to the bag
    #[arg(long)]
    pub commit: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the config file (if any) and applies command line overrides.
    pub fn resolve(&self) -> Result<WidgetConfig> {
        let mut config = match &self.config {
            Some(path) => WidgetConfig::from_file(path)?,
            None => WidgetConfig::default(),
        };

        if let Some(base_url) = &self.api_base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(token) = &self.auth_token {
            config.api.auth_token = Some(token.clone());
        }
        if let Some(limit) = self.limit {
            config.widget.recommendation_limit = Some(limit);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("size", &self.size)?;

        if self.price < Decimal::ZERO {
            return Err(WidgetError::InvalidConfigValueError {
                field: "price".to_string(),
                value: self.price.to_string(),
                reason: "Price cannot be negative".to_string(),
            });
        }

        if let Some(selection) = self
            .selections
            .iter()
            .find(|s| s.product_id == self.product_id)
        {
            return Err(WidgetError::InvalidConfigValueError {
                field: "select".to_string(),
                value: selection.product_id.to_string(),
                reason: "The viewed product is always included".to_string(),
            });
        }

        Ok(())
    }
}
