use crate::{Result, TestInfraError};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "pinhole".to_string())]
    database: String,
    #[builder(default = "pinhole".to_string())]
    username: String,
    #[builder(default = "pinhole".to_string())]
    password: String,
    #[builder(default = "8.4".to_string())]
    tag: String,
    /// Connection attempts made by [`MySqlServer::connect`].
    #[builder(default = 20)]
    connect_attempts: u32,
    #[builder(default = Duration::from_millis(500))]
    connect_backoff: Duration,
    #[builder(default = 5)]
    max_connections: u32,
}

/// A disposable MySQL server for the storage integration tests.
///
/// The container is removed when the value is dropped, so keep it alive for
/// as long as any pool obtained from [`MySqlServer::connect`] is in use.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    pub async fn start(config: MysqlConfig) -> Result<Self> {
        let image = GenericImage::new("mysql", &config.tag)
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"));

        let container = image
            .with_env_var("MYSQL_DATABASE", config.database.clone())
            .with_env_var("MYSQL_USER", config.username.clone())
            .with_env_var("MYSQL_PASSWORD", config.password.clone())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    /// DSN of the test database as seen from the host.
    pub async fn dsn(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        let MysqlConfig {
            database,
            username,
            password,
            ..
        } = &self.config;
        Ok(format!("mysql://{username}:{password}@{host}:{port}/{database}"))
    }

    /// Opens a pool, retrying while the server finishes its startup.
    ///
    /// MySQL logs "ready for connections" once for the temporary init server
    /// as well, so the first attempts may still be refused.
    pub async fn connect(&self) -> Result<MySqlPool> {
        let dsn = self.dsn().await?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = MySqlPoolOptions::new()
                .max_connections(self.config.max_connections)
                .connect(&dsn)
                .await;

            match outcome {
                Ok(pool) => return Ok(pool),
                Err(source) if attempt >= self.config.connect_attempts => {
                    return Err(TestInfraError::MySqlNotReady {
                        attempts: attempt,
                        source,
                    });
                }
                Err(_) => tokio::time::sleep(self.config.connect_backoff).await,
            }
        }
    }
}
