//! Diagnostic binary for verifying the Gemini credential and connectivity
//! This is a utility binary, not part of the main application

use skillsense_backend::assistant::{
    build_prompt, GeminiProvider, ProviderErrorKind, ResponseProvider,
};
use skillsense_backend::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Probing the Gemini provider...\n");
    let config = Config::from_env().assistant;
    config.validate()?;

    // Step 1: credential
    println!("1. Checking for GEMINI_API_KEY environment variable...");
    match &config.credential {
        Some(key) => println!("   ✓ GEMINI_API_KEY is set (length: {} chars)", key.len()),
        None => {
            eprintln!("   ✗ GEMINI_API_KEY not found in environment");
            eprintln!("   The assistant would start in offline mode (fallback replies only).");
            return Err(anyhow::anyhow!("GEMINI_API_KEY not set"));
        }
    }

    let provider = GeminiProvider::from_config(&config)?;

    // Step 2: connectivity probe
    println!("\n2. Probing model '{}' at {}...", config.model, config.api_base_url);
    match provider.probe().await {
        Ok(()) => println!("   ✓ Model reachable"),
        Err(e) => {
            eprintln!("   ✗ Probe failed ({}): {}", describe(e.kind), e);
            return Err(e.into());
        }
    }

    // Step 3: one test prompt
    println!("\n3. Sending a test prompt...");
    let prompt = build_prompt(
        &[],
        "Name one skill every fresher should learn. Answer in one sentence.",
    );
    match provider.generate(&prompt).await {
        Ok(text) => {
            println!("   ✓ Response received:");
            println!("   {}", text.trim());
        }
        Err(e) => {
            eprintln!("   ✗ Generation failed ({}): {}", describe(e.kind), e);
            return Err(e.into());
        }
    }

    println!("\n✓ Provider is ready");
    Ok(())
}

fn describe(kind: ProviderErrorKind) -> &'static str {
    match kind {
        ProviderErrorKind::InvalidCredential => "invalid credential",
        ProviderErrorKind::ContentPolicyRejection => "content policy rejection",
        ProviderErrorKind::Unavailable => "provider unavailable",
    }
}
