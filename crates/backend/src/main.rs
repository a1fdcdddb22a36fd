use backend::shared::{config, data::db};
use backend::system::{self, initialization};
use contracts::shared::list_query::ListQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;
    let db_path = config::get_database_path(&config)?;
    db::initialize_database(Some(&db_path)).await?;

    let admin = initialization::ensure_admin_user_exists().await?;
    if config.seed.demo_data {
        initialization::seed_demo_data(admin).await?;
    }

    let everything = ListQuery::new();
    let (countries, _) = backend::domain::a001_address_country::service::list(&everything).await?;
    let (positions, _) = backend::domain::a003_position::service::list(&everything).await?;
    let (attributes, _) =
        backend::domain::a005_product_attribute::service::list(&everything).await?;
    tracing::info!(
        "Database ready at {}: {} countries, {} positions, {} product attributes",
        db_path.display(),
        countries.total_count,
        positions.total_count,
        attributes.total_count
    );
    Ok(())
}
