use std::sync::Arc;

use anyhow::Context;
use shared::models::{Collection, Counter, Product};
use shared::{EntityStore, MetricsStore};
use storefront::catalog::format_price;
use storefront::utils::validation::{CollectionForm, ProductForm};
use storefront::{
    AdminService, Cart, Config, MemoryBackend, MetricsService, Notifier, OrderManager,
    TracingNotifier, checkout, print_banner, setup_environment,
};
use storefront_client::{RestClient, RestMetrics, RestTable, StorageClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    let config = setup_environment()?;
    print_banner();

    let demo = std::env::args().skip(1).any(|arg| arg == "--demo");
    tracing::info!(environment = %config.environment, demo, "Storefront starting...");

    // 2. 选择后端
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let backend = if demo {
        Backend::demo().await?
    } else {
        Backend::remote(&config)?
    };

    let site = backend.admin.site_config().await.context("loading site config")?;
    tracing::info!(store = %site.store_name, "Site config loaded");

    // 3. 加载并输出
    let mut products = OrderManager::new("products", backend.products, notifier.clone());
    let mut collections = OrderManager::new("collections", backend.collections, notifier);
    products.reload().await.context("loading products")?;
    collections.reload().await.context("loading collections")?;

    if demo {
        // Move the last product to the front and persist it
        let ids: Vec<String> = products.items().iter().map(|p| p.id.clone()).collect();
        if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
            if products.reorder(last, first) {
                let report = products.save_order().await?;
                tracing::info!(written = report.written, "Demo reorder saved");
            }
        }

        let mut cart = Cart::new();
        for product in products.items().iter().take(2) {
            cart.add(product, 1)?;
        }
        let message = checkout(&cart, &config.whatsapp_phone, &backend.metrics).await?;
        println!("Checkout link: {}", message.url);
    }

    let summary = backend.metrics.summary().await.context("loading metrics")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    print_order("Products", products.items(), |p: &Product| {
        format!("{} ({})", p.name, format_price(p.price))
    });
    print_order("Collections", collections.items(), |c: &Collection| {
        format!("{} ({} products)", c.name, c.product_count())
    });

    Ok(())
}

struct Backend {
    products: Arc<dyn EntityStore<Product>>,
    collections: Arc<dyn EntityStore<Collection>>,
    metrics: MetricsService,
    admin: AdminService,
}

impl Backend {
    fn remote(config: &Config) -> anyhow::Result<Self> {
        let client_config = config
            .client_config()
            .context("BACKEND_URL and BACKEND_API_KEY must be set (or run with --demo)")?;
        let client = RestClient::new(client_config)?;
        tracing::info!(url = %client.config().base(), "Using hosted backend");

        let products = Arc::new(RestTable::<Product>::products(client.clone()));
        let collections = Arc::new(RestTable::<Collection>::collections(client.clone()));
        let admin = AdminService::new(
            products.clone(),
            collections.clone(),
            Arc::new(client.clone()),
            Arc::new(StorageClient::new(client.clone())),
        );

        Ok(Self {
            products,
            collections,
            metrics: MetricsService::new(Arc::new(RestMetrics::new(client))),
            admin,
        })
    }

    async fn demo() -> anyhow::Result<Self> {
        let backend = Arc::new(MemoryBackend::new());
        let admin = AdminService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        );

        let seed = [
            ("Taza Alba", "tazas", "12.50", true),
            ("Plato Tierra", "platos", "24.00", false),
            ("Jarrón Niebla", "jarrones", "48.00", true),
            ("Cuenco Mar", "cuencos", "18.00", false),
        ];
        let mut ids = Vec::new();
        for (name, category, price, featured) in seed {
            let form = ProductForm {
                name: name.to_string(),
                description: format!("{name}, hecho a mano"),
                price: price.to_string(),
                category: category.to_string(),
                stock: "5".to_string(),
                images: Vec::new(),
                featured,
            };
            ids.push(admin.create_product(&form).await?.id);
        }
        admin
            .create_collection(&CollectionForm {
                name: "Mesa de verano".to_string(),
                description: "Piezas para compartir".to_string(),
                image: String::new(),
                product_ids: ids.iter().take(2).cloned().collect(),
            })
            .await?;

        let today = chrono::Utc::now().date_naive();
        backend.insert_count(&Counter::PageVisits, today, 42).await?;
        for (idx, id) in ids.iter().enumerate() {
            backend
                .insert_count(&Counter::ProductViews(id.clone()), today, (idx as u64 + 1) * 3)
                .await?;
        }
        backend
            .insert_count(&Counter::WhatsappClicks(None), today, 4)
            .await?;

        tracing::info!(products = ids.len(), "Demo backend seeded");
        Ok(Self {
            products: backend.clone(),
            collections: backend.clone(),
            metrics: MetricsService::new(backend),
            admin,
        })
    }
}

fn print_order<T>(title: &str, items: &[T], describe: impl Fn(&T) -> String)
where
    T: shared::Orderable,
{
    println!("\n{title}:");
    for item in items {
        println!("  {:>3}. {}", item.display_order(), describe(item));
    }
}
