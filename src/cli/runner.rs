//! CLI runner - executes commands

use crate::auth::QueryParams;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::csc::{
    ApiSource, Catalog, CscFilter, CscSort, CscSource, CscSummary, FallbackSource, FileSource,
    SortField,
};
use crate::error::{Error, Result, ResultExt};
use crate::http::{join_references, CommandoClient};
use crate::overrides::OverrideStore;
use crate::types::SortDirection;
use serde::Serialize;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.app_config()?;

        match &self.cli.command {
            Commands::CscList { client } => {
                let value = self.client(&config)?.get_csc_list(client).await?;
                self.print(&value)
            }
            Commands::Backorders { client, refs } => {
                let value = self
                    .client(&config)?
                    .get_backorders(client, &join_references(refs.as_slice()))
                    .await?;
                self.print(&value)
            }
            Commands::Stock { refs, alert } => {
                let value = self
                    .client(&config)?
                    .get_stock_availability(&join_references(refs.as_slice()), *alert)
                    .await?;
                self.print(&value)
            }
            Commands::Pricing {
                client,
                refs,
                full_info,
            } => {
                let value = self
                    .client(&config)?
                    .get_pricing(client, &join_references(refs.as_slice()), *full_info)
                    .await?;
                self.print(&value)
            }
            Commands::Url { params } => {
                let params: QueryParams = params.iter().cloned().collect();
                let url = self.client(&config)?.build_url(params)?;
                println!("{url}");
                Ok(())
            }
            Commands::List {
                client,
                user,
                status,
                product_ref,
                sort,
                direction,
            } => {
                let filter = CscFilter {
                    status: status.clone(),
                    product_ref: product_ref.clone(),
                };
                self.list(
                    &config,
                    client.as_deref(),
                    user.as_deref(),
                    &filter,
                    CscSort::new(*sort, *direction),
                )
                .await
            }
            Commands::Detail {
                reference,
                client,
                user,
            } => {
                let catalog = self
                    .catalog(&config, client.as_deref(), user.as_deref())
                    .await?;
                let csc = catalog.detail(reference)?;
                self.print(csc)
            }
            Commands::SetQuantity {
                user,
                reference,
                product,
                quantity,
            } => {
                let store = self.store_for_write(&config)?;
                store
                    .set_quantity(user, reference, product, *quantity)
                    .await?;
                info!(
                    "Quantity for {}/{} set to {} for user {}",
                    reference, product, quantity, user
                );
                self.print_user_overrides(&store, user).await
            }
            Commands::SetStatus {
                user,
                reference,
                status,
            } => {
                let store = self.store_for_write(&config)?;
                store.set_status(user, reference, status).await?;
                info!("Status of {} set to '{}' for user {}", reference, status, user);
                self.print_user_overrides(&store, user).await
            }
            Commands::CheckAttachment { name, size, mime } => {
                let meta = config.attachments.describe(name, *size, mime)?;
                self.print(&meta)
            }
        }
    }

    /// Load the config file (if any) and apply environment overrides
    fn app_config(&self) -> Result<AppConfig> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Loading config {}", path.display()))?,
            None => AppConfig::default(),
        };
        Ok(config.with_env())
    }

    fn client(&self, config: &AppConfig) -> Result<CommandoClient> {
        CommandoClient::new(config.client_config()?)
    }

    fn store(&self, config: &AppConfig) -> Result<OverrideStore> {
        match &config.overrides.store_file {
            Some(path) => OverrideStore::from_file(path),
            None => {
                debug!("No overrides.store_file configured, overrides are kept in memory");
                Ok(OverrideStore::in_memory())
            }
        }
    }

    /// Pick the catalog source for this invocation.
    ///
    /// With a client code the webservice is primary and the data file, when
    /// configured, is the fallback. Without one only the data file is used.
    fn source(&self, config: &AppConfig, client_code: Option<&str>) -> Result<Box<dyn CscSource>> {
        let file = config.catalog.data_file.as_ref().map(FileSource::new);

        match (client_code, file) {
            (Some(_), Some(file)) => {
                let api = ApiSource::new(self.client(config)?);
                Ok(Box::new(FallbackSource::new(Box::new(api), Box::new(file))))
            }
            (Some(_), None) => Ok(Box::new(ApiSource::new(self.client(config)?))),
            (None, Some(file)) => Ok(Box::new(file)),
            (None, None) => Err(Error::config(
                "No CSC source: pass --client or set catalog.data_file",
            )),
        }
    }

    /// Store for the write commands; these require a file so nothing is lost
    fn store_for_write(&self, config: &AppConfig) -> Result<OverrideStore> {
        config
            .overrides
            .store_file
            .as_ref()
            .map(OverrideStore::from_file)
            .ok_or_else(|| Error::missing_field("overrides.store_file"))?
    }

    async fn catalog(
        &self,
        config: &AppConfig,
        client_code: Option<&str>,
        user: Option<&str>,
    ) -> Result<Catalog> {
        let source = self.source(config, client_code)?;
        let mut catalog = source.fetch(client_code.unwrap_or_default()).await?;

        if let Some(user) = user {
            let store = self.store(config)?;
            if let Some(overrides) = store.get_user_csc(user).await {
                let applied = catalog.apply_overrides(&overrides);
                debug!("Applied {} override values for user {}", applied, user);
            }
        }

        Ok(catalog)
    }

    async fn list(
        &self,
        config: &AppConfig,
        client_code: Option<&str>,
        user: Option<&str>,
        filter: &CscFilter,
        sort: CscSort,
    ) -> Result<()> {
        let catalog = self.catalog(config, client_code, user).await?;
        let rows = catalog.list(filter, sort);

        match self.cli.format {
            OutputFormat::Json => self.print(&rows),
            OutputFormat::Pretty => {
                print!("{}", format_table(&rows, sort.field, sort.direction));
                Ok(())
            }
        }
    }

    async fn print_user_overrides(&self, store: &OverrideStore, user: &str) -> Result<()> {
        let overrides = store.get_user_csc(user).await.unwrap_or_default();
        self.print(&overrides)
    }

    fn print<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let out = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{out}");
        Ok(())
    }
}

/// Render listing rows as an aligned text table; the sorted column is marked
fn format_table(rows: &[CscSummary], sort: SortField, direction: SortDirection) -> String {
    let arrow = match direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    };
    let header = |field: SortField, label: &str| {
        if field == sort {
            format!("{label} {arrow}")
        } else {
            label.to_string()
        }
    };

    let ref_width = rows
        .iter()
        .map(|r| r.reference.chars().count())
        .chain([12])
        .max()
        .unwrap_or(12);

    let mut out = format!(
        "{:<ref_width$}  {:<12}  {:<12}  {:<12}  {}\n",
        header(SortField::Reference, "Référence"),
        header(SortField::StartDate, "Début"),
        header(SortField::EndDate, "Fin"),
        header(SortField::Status, "Statut"),
        "Produits",
    );
    for row in rows {
        out.push_str(&format!(
            "{:<ref_width$}  {:<12}  {:<12}  {:<12}  {}\n",
            row.reference,
            row.start_date.format("%d/%m/%Y").to_string(),
            row.end_date.format("%d/%m/%Y").to_string(),
            row.status,
            row.product_count,
        ));
    }
    if rows.is_empty() {
        out.push_str("(aucune CSC)\n");
    }
    out
}
