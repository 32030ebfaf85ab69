use clap::Parser;
use companion_cart::adapters::build_client;
use companion_cart::core::affordance::COMPLETED_TEXT;
use companion_cart::utils::error::ErrorSeverity;
use companion_cart::utils::{logger, validation::Validate};
use companion_cart::{
    CartService, CliConfig, FreqBoughtTogether, HttpCartService, HttpRecommendationSource,
    Product, RecommendationSource, Selection, WidgetError, WidgetView,
};

fn apply_selection<R: RecommendationSource, C: CartService>(
    widget: &mut FreqBoughtTogether<R, C>,
    selection: &Selection,
) -> companion_cart::Result<()> {
    widget.toggle(selection.product_id)?;
    if let Some(size) = &selection.size {
        widget.set_size(selection.product_id, size)?;
    }
    Ok(())
}

fn exit_with(e: &WidgetError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 驗證並合併配置
    let config = match args.validate().and_then(|_| args.resolve()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.log_format() == "json" {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting companion-cart for product {}", args.product_id);
    tracing::debug!("Resolved config: {:?}", config);

    let client = build_client(config.api.timeout_seconds)?;
    let source = HttpRecommendationSource::new(client.clone(), config.base_url())?;
    let cart = HttpCartService::new(client, config.base_url(), config.auth_token())?;

    let primary = Product::new(args.product_id, args.price);
    let mut widget =
        match FreqBoughtTogether::new(primary, &args.size, source, cart, config.widget_options()) {
            Ok(widget) => widget,
            Err(e) => exit_with(&e),
        };

    let status = widget.load().await;
    tracing::debug!("Recommendation status: {:?}", status);

    for selection in &args.selections {
        if let Err(e) = apply_selection(&mut widget, selection) {
            tracing::warn!("Skipping selection {}: {}", selection.product_id, e);
            eprintln!("⚠️  {}", e.user_friendly_message());
        }
    }

    let view = match widget.view() {
        WidgetView::Hidden => {
            println!("No recommendations available yet.");
            return Ok(());
        }
        WidgetView::EmptyFrame => {
            println!("Frequently bought together: nothing to recommend.");
            return Ok(());
        }
        WidgetView::Ready(view) => view,
    };

    println!("Frequently bought together");
    for product in std::iter::once(&view.primary).chain(view.companions.iter()) {
        let entry = view.entries.iter().find(|e| e.product_id == product.id);
        let mark = if entry.is_some() { "[x]" } else { "[ ]" };
        let size = match entry {
            Some(e) if e.size.is_empty() => "(choose a size)",
            Some(e) => e.size.as_str(),
            None => "",
        };
        let name = product
            .metadata
            .get("productName")
            .and_then(|v| v.as_str())
            .unwrap_or("Product");
        println!("  {} #{} {} {} {}", mark, product.id, name, product.price, size);
    }

    let Some(total) = view.total_display else {
        return Ok(());
    };
    println!("Total Price: {}", total);

    if !args.commit {
        println!("Run with --commit to \"{}\"", view.affordance.default_text);
        return Ok(());
    }

    println!("⏳ {}...", view.affordance.loading_text);
    let report = widget.commit_detailed().await;
    for item in report.committed() {
        tracing::info!("Added product {} (size {})", item.product_id, item.size);
    }

    match report.into_result() {
        Ok(report) if report.succeeded() => {
            println!("✅ {}", COMPLETED_TEXT);
            Ok(())
        }
        Ok(_) => {
            println!("Commit abandoned.");
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}
