use common::Result;
use common::config::Settings;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

/// Loads the processed files from object storage into the warehouse.
///
/// Every load is a full reload: the target table is truncated and then
/// repopulated from whatever currently sits under the processed-files
/// prefix in the bucket.
pub struct WarehouseLoader {
    pool: PgPool,
    schema: String,
    table: String,
    stage_url: String,
    iam_role: String,
}

impl WarehouseLoader {
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&settings.warehouse_url())
            .await?;

        Ok(Self {
            pool,
            schema: settings.warehouse_schema.clone(),
            table: settings.warehouse_table.clone(),
            stage_url: settings.processed_stage_url(),
            iam_role: settings.warehouse_iam_role.clone(),
        })
    }

    /// Read the warehouse version - used as a basic connection test.
    pub async fn read_version(&self) -> Result<String> {
        let row = sqlx::query("SELECT version()").fetch_one(&self.pool).await?;
        Ok(row.get(0))
    }

    /// Truncate the target table and reload it from the external stage.
    pub async fn load(&self) -> Result<()> {
        debug!("Testing connectivity to the warehouse...");
        let version = self.read_version().await?;
        debug!(version = %version, "Connected to the warehouse");

        debug!("Loading data into the warehouse...");
        sqlx::query(&truncate_statement(&self.schema, &self.table))
            .execute(&self.pool)
            .await?;
        sqlx::query(&copy_statement(
            &self.schema,
            &self.table,
            &self.stage_url,
            &self.iam_role,
        ))
        .execute(&self.pool)
        .await?;
        debug!("Data load completed.");

        Ok(())
    }
}

pub fn truncate_statement(schema: &str, table: &str) -> String {
    format!("TRUNCATE TABLE {schema}.{table}")
}

pub fn copy_statement(schema: &str, table: &str, stage_url: &str, iam_role: &str) -> String {
    format!(
        "COPY {schema}.{table} FROM '{stage_url}' IAM_ROLE '{iam_role}' CSV GZIP IGNOREHEADER 1"
    )
}

/// Run the warehouse load, logging progress. Errors propagate to the caller,
/// which owns this failure domain independently of file processing.
pub async fn run_load(settings: &Settings) -> Result<()> {
    info!("Starting warehouse processing...");
    let loader = WarehouseLoader::connect(settings).await?;
    loader.load().await?;
    info!("Finished warehouse processing.");
    Ok(())
}
