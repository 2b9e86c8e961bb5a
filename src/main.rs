use rtryon::{
    logger, BodyAdjustment, Config, DataUrl, GeminiClient, Outcome, TryOnClient, TryOnSession,
};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    logger::init_with_config(logger::LoggerConfig::from_config(&config))?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    logger::log_config_info(&config);

    let mut args = env::args().skip(1);
    let Some(photo) = args.next().map(PathBuf::from) else {
        log::error!("❌ Usage: rtryon <photo> [garment] [pose] [more|less]");
        return Err("missing photo argument".into());
    };
    let garment = args.next().map(PathBuf::from);
    let pose = args.next();
    let adjustment = args.next().map(|d| d.parse::<BodyAdjustment>()).transpose()?;

    let client = GeminiClient::new(config.gemini.clone())?;
    let session = TryOnSession::new(TryOnClient::new(client));

    log::info!("📸 Generating model from {}", photo.display());
    let model = expect_image("model", session.create_model(photo).await)?;
    save("model", &model).await?;

    if let Some(path) = garment {
        let item = session.add_garment_file(&path).await?;
        let dressed = expect_image("try-on", session.apply_garment(&item.id).await)?;
        save("try-on", &dressed).await?;
    }

    if let Some(pose) = pose {
        let posed = expect_image("pose", session.select_pose(&pose).await)?;
        save("pose", &posed).await?;
    }

    if let Some(direction) = adjustment {
        let adjusted = expect_image("adjustment", session.adjust_body(direction).await)?;
        save("adjusted", &adjusted).await?;
    }

    log::info!("🎉 Done");
    Ok(())
}

fn expect_image(step: &str, outcome: Outcome<DataUrl>) -> Result<DataUrl, String> {
    match outcome {
        Outcome::Applied(image) => Ok(image),
        Outcome::Failed(message) => {
            log::error!("❌ {} failed: {}", step, message);
            Err(message)
        }
        other => Err(format!("{} did not run: {:?}", step, other)),
    }
}

async fn save(step: &str, image: &DataUrl) -> Result<(), Box<dyn std::error::Error>> {
    let filename = format!(
        "rtryon_{}_{}.{}",
        step,
        chrono::Utc::now().timestamp(),
        image.extension()
    );
    tokio::fs::write(&filename, image.decode()?).await?;
    log::info!("💾 Saved {} image to {}", step, filename);
    Ok(())
}
