use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use defer_core::ports::{Clock, JobStore, SystemClock};
use defer_core::{
    Class, DeferBuilder, DeferError, DeferSettings, EnqueueOptions, Interceptor, MethodError,
    ObjectRegistry, Performable, TargetRef, Worker,
};

/// A newsletter whose whole state travels with the job.
#[derive(Debug, Clone, Deserialize)]
struct Newsletter {
    subject: String,
    urgent: bool,
}

impl Performable for Newsletter {
    fn target(&self) -> TargetRef {
        // Same shape as the derived `Deserialize`, built field by field.
        TargetRef::value(
            Self::NAME,
            json!({ "subject": self.subject, "urgent": self.urgent }),
        )
    }

    fn responds_to(&self, method: &str) -> bool {
        Self::has_method(method)
    }

    fn perform(&mut self, method: &str, args: &[Value]) -> Result<Value, MethodError> {
        match method {
            "deliver!" => {
                MethodError::check_arity(method, 1, args.len())?;
                let recipient = args[0].as_str().ok_or_else(|| MethodError::Argument {
                    method: method.to_string(),
                    reason: "recipient must be a string".to_string(),
                })?;
                println!("delivering {:?} to {recipient}", self.subject);
                Ok(json!({ "delivered_to": recipient }))
            }
            _ => Err(MethodError::no_method(Self::NAME, method)),
        }
    }
}

impl Class for Newsletter {
    const NAME: &'static str = "Newsletter";
    const METHODS: &'static [&'static str] = &["deliver!"];
}

/// Settings come from the JSON file named by the first argument, if any.
fn load_settings() -> Result<DeferSettings, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Ok(DeferSettings::from_json_str(&raw)?)
        }
        None => Ok(DeferSettings::default()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // (A) 設定と部品を用意
    let settings = load_settings()?;
    info!(
        delay_jobs = settings.delay_jobs,
        default_priority = settings.default_priority,
        "settings loaded"
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let enqueuer = DeferBuilder::new()
        .settings(&settings)
        .clock(Arc::clone(&clock))
        .build();

    let mut registry = ObjectRegistry::with_builtins();
    registry.register_value::<Newsletter>();

    // (B) deliver! を非同期化（urgent なら優先）
    let mut newsletters = Interceptor::<Newsletter>::new(enqueuer.clone());
    newsletters.handle_asynchronously(
        "deliver!",
        EnqueueOptions::new().priority_with(|n: &Newsletter| if n.urgent { -10 } else { 10 }),
    )?;

    // (C) 呼び出し（delay_jobs = false ならその場で実行される）
    let mut weekly = Newsletter {
        subject: "Weekly digest".to_string(),
        urgent: false,
    };
    let mut outage = Newsletter {
        subject: "Service outage".to_string(),
        urgent: true,
    };
    let deliveries = [
        (&mut weekly, "alice@example.com"),
        (&mut outage, "bob@example.com"),
    ];
    for (newsletter, recipient) in deliveries {
        let invocation = newsletters
            .call(newsletter, "deliver!", vec![json!(recipient)])
            .await?;
        match invocation.job() {
            Some(job) => info!(
                job_id = %job.id,
                name = %job.name(),
                priority = job.priority,
                "deferred"
            ),
            None => info!(result = ?invocation.value(), "ran directly"),
        }
    }

    let mut greeting = String::from("hello");
    enqueuer
        .delay(&mut greeting)
        .call("count", vec![json!("l")])
        .await?;
    enqueuer
        .delay_class::<Newsletter>()
        .priority(20)
        .call("to_s", vec![])
        .await?;

    // (D) worker で due な Job を処理
    let worker = Worker::new(Arc::clone(enqueuer.store()), Arc::new(registry), clock);
    let report = worker.work_off(100).await?;
    println!(
        "worked off {} jobs: succeeded={} failed={}",
        report.total(),
        report.succeeded,
        report.failed
    );

    let left = enqueuer.store().count().await?;
    if left > 0 {
        return Err(DeferError::Store(format!("{left} jobs left in the queue")).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use defer_core::ports::ObjectLookup;

    #[test]
    fn newsletter_target_rebuilds_the_same_newsletter() {
        let newsletter = Newsletter {
            subject: "Spring issue".to_string(),
            urgent: true,
        };
        let mut registry = ObjectRegistry::new();
        registry.register_value::<Newsletter>();

        let mut rebuilt = registry.resolve(&newsletter.target()).unwrap();
        let delivered = rebuilt.perform("deliver!", &[json!("ada@example.com")]).unwrap();

        assert_eq!(delivered, json!({ "delivered_to": "ada@example.com" }));
        assert_eq!(
            rebuilt.target(),
            TargetRef::value("Newsletter", json!({ "subject": "Spring issue", "urgent": true }))
        );
    }
}
