use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::DeviceRegistryConfig;
use crate::contract::client::DeviceRegistryApi;
use crate::domain::repo::{DevicesRepository, PassportsRepository};
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::DeviceRegistryLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmRegistryRepository;

/// Wiring for the device registry: storage, domain service and local client.
#[derive(Default)]
pub struct DeviceRegistry {
    // Set once by `init`, read by every client call.
    service: arc_swap::ArcSwapOption<Service>,
}

impl Clone for DeviceRegistry {
    fn clone(&self) -> Self {
        Self {
            service: arc_swap::ArcSwapOption::new(self.service.load_full()),
        }
    }
}

impl DeviceRegistry {
    pub const NAME: &'static str = "device_registry";

    /// Bring the schema up to date.
    pub async fn migrate(&self, conn: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running device_registry database migrations");
        Migrator::up(conn, None).await?;
        info!("Device registry migrations completed successfully");
        Ok(())
    }

    pub async fn init(
        &self,
        conn: DatabaseConnection,
        cfg: &DeviceRegistryConfig,
    ) -> anyhow::Result<()> {
        info!("Initializing device_registry module");
        debug!(
            "Loaded device_registry config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );
        if cfg.default_page_size == 0 || cfg.max_page_size < cfg.default_page_size {
            anyhow::bail!(
                "invalid page sizes: default_page_size={}, max_page_size={}",
                cfg.default_page_size,
                cfg.max_page_size
            );
        }

        // One repository serves both ports so passports and devices share a store.
        let repo = Arc::new(SeaOrmRegistryRepository::new(conn));
        let passports: Arc<dyn PassportsRepository> = repo.clone();
        let devices: Arc<dyn DevicesRepository> = repo;

        let service = Service::new(passports, devices, ServiceConfig::from(cfg));
        self.service.store(Some(Arc::new(service)));
        info!("Device registry initialized");
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client over the initialized service.
    pub fn client(&self) -> anyhow::Result<Arc<dyn DeviceRegistryApi>> {
        let api: Arc<dyn DeviceRegistryApi> =
            Arc::new(DeviceRegistryLocalClient::new(self.service()?));
        Ok(api)
    }
}
