use seller_backoffice::domain::seller::SellerStatus;
use seller_backoffice::infra::{config, telemetry};
use seller_backoffice::storage::schema;
use seller_backoffice::DatabaseService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--apply-schema]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DB_MAX_CONNECTIONS, BIND_ADDR, APPLY_SCHEMA, RUST_LOG\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let apply_schema = args.iter().any(|a| a == "--apply-schema");

    // Force-read config (nice error messages if missing)
    let database_url = config::database_url()?;
    let max_connections = config::max_connections();

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config::bind_addr());
    println!("  DB_MAX_CONNECTIONS={}", max_connections);
    println!("  APPLY_SCHEMA={}", config::apply_schema());

    let db_service = DatabaseService::connect(&database_url, max_connections).await?;
    db_service
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Database is not reachable: {}", e))?;
    println!("  Database is reachable.");

    if apply_schema {
        println!("  Applying schema...");
        db_service.apply_schema().await?;
    }

    let seeded = schema::seeded_status_count(db_service.pool()).await.map_err(|e| {
        anyhow::anyhow!("Seller lookup tables are missing ({}). Re-run with --apply-schema", e)
    })?;
    let expected = SellerStatus::ALL.len() as i64;
    if seeded != expected {
        return Err(anyhow::anyhow!(
            "Expected {} seeded seller statuses, found {}. Re-run with --apply-schema",
            expected,
            seeded
        ));
    }
    println!("  Seller statuses seeded ({}/{}).", seeded, expected);

    println!("> Preflight OK.");
    Ok(())
}
