mod auth;
mod authentication;
mod config;
mod db;
mod error;
mod listing;
mod logger;
mod product;
mod purchase;
mod routes;
mod user;
mod validation;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use chrono::{Duration, Utc};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::fs;
use std::io;
use std::sync::Arc;

use auth::{JwtManager, LoginGuard};
use authentication::AuthenticationService;
use config::AppConfig;
use log::info;
use product::{PgProductRepository, ProductService};
use purchase::{PgPurchaseRepository, PurchaseService};
use user::{PgUserRepository, UserRepository, UserService};

// 登录记录清理间隔（秒）
const GUARD_CLEANUP_SECS: u64 = 300;

// 应用状态
struct AppState {
    authentication: AuthenticationService,
    login_guard: LoginGuard,
    users: UserService,
    products: ProductService,
    purchases: PurchaseService,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载 .env
    dotenv().ok();

    let config = AppConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("配置错误: {}", e)))?;

    // 创建日志目录
    if !config.log_dir.exists() {
        fs::create_dir_all(&config.log_dir)?;
    }

    // 初始化日志系统
    let log_path = config.log_dir.join("app.log");
    if let Err(e) = logger::Logger::init(&log_path, config.log_level) {
        eprintln!("初始化日志系统失败: {}，改用标准错误输出", e);
        let _ = env_logger::Builder::new()
            .filter_level(config.log_level)
            .try_init();
    }

    info!("应用程序启动");

    // 连接数据库
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("数据库连接错误: {}", e)))?;

    // 初始化数据库
    db::initialize_db(pool.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("数据库初始化错误: {}", e)))?;

    let jwt = Arc::new(JwtManager::new(
        &config.jwt_secret,
        Duration::hours(config.token_ttl_hours),
    ));
    let user_repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let authentication =
        AuthenticationService::new(user_repository.clone(), jwt.clone(), config.bcrypt_cost)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("认证服务初始化错误: {}", e)))?;

    let app_state = web::Data::new(AppState {
        authentication,
        login_guard: LoginGuard::new(config.guard_scope),
        users: UserService::new(user_repository, config.bcrypt_cost),
        products: ProductService::new(Arc::new(PgProductRepository::new(pool.clone()))),
        purchases: PurchaseService::new(Arc::new(PgPurchaseRepository::new(pool))),
    });

    // 启动登录记录清理任务
    let cleanup_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(GUARD_CLEANUP_SECS));
        loop {
            interval.tick().await;
            cleanup_state.login_guard.cleanup_expired(Utc::now()).await;
        }
    });

    info!("服务器启动在 http://{}:{}", config.host, config.port);

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let jwt = jwt.clone();
        App::new()
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .configure(move |cfg| routes::configure(cfg, jwt))
    })
    .bind(bind_addr)?
    .run()
    .await
}
