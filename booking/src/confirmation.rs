//! Client-facing confirmation messages.
//!
//! A [`ConfirmationProducer`] turns an [`Appointment`] into the text sent to
//! the client. [`TemplateProducer`] is deterministic. [`GenerativeProducer`]
//! asks a [`TextGenerator`] backend and falls back to the template on any
//! failure, timeout or blank answer, so callers always get non-empty text.

use crate::config::GenerationConfig;
use crate::format;
use crate::types::Appointment;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use studio_anthropic::{AnthropicClient, MessagesRequest, types::Message};
use thiserror::Error;

/// Boxed future returned by the producer and generator traits
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Noun used when the appointment has no named barber
pub const GENERIC_BARBER: &str = "our professional";

/// Produces the confirmation text for a committed appointment
pub trait ConfirmationProducer: Send + Sync {
    /// Returns non-empty, trimmed text
    fn produce(&self, appointment: Appointment) -> BoxFuture<String>;
}

// ============================================================================
// Template
// ============================================================================

/// Deterministic confirmation sentence
#[derive(Clone, Debug)]
pub struct TemplateProducer {
    shop_name: String,
}

impl TemplateProducer {
    /// Creates a template producer signing as `shop_name`
    #[must_use]
    pub fn new(shop_name: impl Into<String>) -> Self {
        Self {
            shop_name: shop_name.into(),
        }
    }

    /// Renders the template synchronously
    #[must_use]
    pub fn render(&self, appointment: &Appointment) -> String {
        format!(
            "Hello {}, your {} appointment with {} on {} at {} is confirmed! Thank you for choosing {}.",
            appointment.client_name,
            appointment.service.name,
            appointment.barber_name.as_deref().unwrap_or(GENERIC_BARBER),
            format::short_date(appointment.date),
            appointment.time,
            self.shop_name,
        )
    }
}

impl ConfirmationProducer for TemplateProducer {
    fn produce(&self, appointment: Appointment) -> BoxFuture<String> {
        let text = self.render(&appointment);
        Box::pin(async move { text })
    }
}

// ============================================================================
// Text generation backend
// ============================================================================

/// Failure of a text generation backend
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend reported an error
    #[error("text generation failed: {0}")]
    Backend(String),
    /// Backend did not answer in time
    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),
    /// Backend answered with nothing usable
    #[error("text generation returned blank output")]
    Blank,
}

/// Prompt plus sampling parameters for one generation call
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationPrompt {
    /// Instructions for the backend
    pub system: String,
    /// Appointment details to write about
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Output length cap
    pub max_tokens: u32,
}

/// Free-text generation backend
pub trait TextGenerator: Send + Sync {
    /// Generates text for `prompt`
    fn generate(&self, prompt: GenerationPrompt) -> BoxFuture<Result<String, GenerationError>>;
}

/// [`TextGenerator`] backed by the Anthropic Messages API
#[derive(Clone, Debug)]
pub struct AnthropicGenerator {
    client: AnthropicClient,
    model: String,
}

impl AnthropicGenerator {
    /// Wraps a configured client
    #[must_use]
    pub fn new(client: AnthropicClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl TextGenerator for AnthropicGenerator {
    fn generate(&self, prompt: GenerationPrompt) -> BoxFuture<Result<String, GenerationError>> {
        let client = self.client.clone();
        let request = MessagesRequest::new(vec![Message::user(prompt.user)])
            .with_model(self.model.clone())
            .with_system(prompt.system)
            .with_max_tokens(prompt.max_tokens)
            .with_temperature(prompt.temperature)
            .with_top_p(prompt.top_p)
            .with_top_k(prompt.top_k);

        Box::pin(async move {
            let response = client
                .messages(request)
                .await
                .map_err(|e| GenerationError::Backend(e.to_string()))?;
            Ok(response.text())
        })
    }
}

// ============================================================================
// Generative producer
// ============================================================================

/// Confirmation producer that asks a [`TextGenerator`] first
pub struct GenerativeProducer {
    generator: Arc<dyn TextGenerator>,
    fallback: TemplateProducer,
    settings: GenerationConfig,
    shop_name: String,
}

impl GenerativeProducer {
    /// Creates a producer over `generator`
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        shop_name: impl Into<String>,
        settings: GenerationConfig,
    ) -> Self {
        let shop_name = shop_name.into();
        Self {
            generator,
            fallback: TemplateProducer::new(shop_name.clone()),
            settings,
            shop_name,
        }
    }

    /// Builds the prompt for an appointment
    #[must_use]
    pub fn prompt(&self, appointment: &Appointment) -> GenerationPrompt {
        let system = format!(
            "You are the virtual assistant of {shop}. Write a short, friendly, slightly \
             enthusiastic and professional booking confirmation suitable for WhatsApp. \
             Address the client by name, include every detail you are given, and finish by \
             thanking them with a short line building positive expectation. Do not use \
             markdown. Reply with the message text only.",
            shop = self.shop_name
        );

        let mut user = format!(
            "Client: {}\nService: {}\n",
            appointment.client_name, appointment.service.name
        );
        if let Some(barber) = &appointment.barber_name {
            user.push_str(&format!("Barber: {barber}\n"));
        }
        user.push_str(&format!(
            "Date: {}\nTime: {}\nBarbershop: {}",
            format::long_date(appointment.date),
            appointment.time,
            self.shop_name
        ));

        GenerationPrompt {
            system,
            user,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            top_k: self.settings.top_k,
            max_tokens: self.settings.max_tokens,
        }
    }
}

impl ConfirmationProducer for GenerativeProducer {
    fn produce(&self, appointment: Appointment) -> BoxFuture<String> {
        let prompt = self.prompt(&appointment);
        let fallback = self.fallback.render(&appointment);
        let generator = Arc::clone(&self.generator);
        let timeout = self.settings.timeout;

        Box::pin(async move {
            let outcome = match tokio::time::timeout(timeout, generator.generate(prompt)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
                Ok(Ok(_)) => Err(GenerationError::Blank),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(GenerationError::Timeout(timeout)),
            };

            match outcome {
                Ok(text) => {
                    metrics::counter!("studio.confirmation.generated").increment(1);
                    text
                },
                Err(error) => {
                    tracing::warn!(%error, "Falling back to template confirmation");
                    metrics::counter!("studio.confirmation.fallback").increment(1);
                    fallback
                },
            }
        })
    }
}

/// Picks the producer for the configured backend
///
/// A configured API key selects the generative producer over the Anthropic
/// API. Without one, or if the client cannot be built, the template is used.
#[must_use]
pub fn producer_from_config(
    generation: &GenerationConfig,
    shop_name: &str,
) -> Arc<dyn ConfirmationProducer> {
    let Some(api_key) = generation.api_key.as_deref() else {
        tracing::info!("No text generation key configured, using template confirmations");
        return Arc::new(TemplateProducer::new(shop_name));
    };

    let mut client = AnthropicClient::new(api_key);
    if let Some(base_url) = &generation.base_url {
        client = client.with_base_url(base_url.clone());
    }
    match client.with_timeout(generation.timeout) {
        Ok(client) => {
            tracing::info!(model = %generation.model, "Using generated confirmations");
            Arc::new(GenerativeProducer::new(
                Arc::new(AnthropicGenerator::new(client, generation.model.clone())),
                shop_name,
                generation.clone(),
            ))
        },
        Err(error) => {
            tracing::warn!(%error, "Text generation client unavailable, using template confirmations");
            Arc::new(TemplateProducer::new(shop_name))
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::mocks::{ScriptedGenerator, sample_appointment};

    fn settings() -> GenerationConfig {
        GenerationConfig {
            timeout: Duration::from_millis(50),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn template_names_every_detail() {
        let appointment = sample_appointment();
        let text = TemplateProducer::new("StudioBarber1002").render(&appointment);
        assert_eq!(
            text,
            "Hello Ana Souza, your Corte Social appointment with Rayff on 12/03/2026 at 10:30 is \
             confirmed! Thank you for choosing StudioBarber1002."
        );
    }

    #[test]
    fn template_uses_generic_noun_without_barber() {
        let mut appointment = sample_appointment();
        appointment.barber_name = None;
        let text = TemplateProducer::new("Shop").render(&appointment);
        assert!(text.contains("with our professional on"));
    }

    #[test]
    fn template_producer_resolves_immediately() {
        let producer = TemplateProducer::new("Shop");
        let text = tokio_test::block_on(producer.produce(sample_appointment()));
        assert!(text.starts_with("Hello Ana Souza"));
    }

    #[test]
    fn prompt_carries_sampling_parameters() {
        let producer = GenerativeProducer::new(
            Arc::new(ScriptedGenerator::replying("ok")),
            "StudioBarber1002",
            GenerationConfig::default(),
        );
        let prompt = producer.prompt(&sample_appointment());
        assert!((prompt.temperature - 0.7).abs() < f32::EPSILON);
        assert!((prompt.top_p - 0.95).abs() < f32::EPSILON);
        assert_eq!(prompt.top_k, 40);
        assert!(prompt.user.contains("Barber: Rayff"));
        assert!(prompt.user.contains("Thursday, March 12, 2026"));
        assert!(prompt.system.contains("StudioBarber1002"));
    }

    #[test]
    fn prompt_omits_missing_barber() {
        let producer = GenerativeProducer::new(
            Arc::new(ScriptedGenerator::replying("ok")),
            "Shop",
            GenerationConfig::default(),
        );
        let mut appointment = sample_appointment();
        appointment.barber_name = None;
        assert!(!producer.prompt(&appointment).user.contains("Barber:"));
    }

    #[tokio::test]
    async fn generated_text_is_trimmed() {
        let producer = GenerativeProducer::new(
            Arc::new(ScriptedGenerator::replying("  See you Thursday, Ana!  \n")),
            "Shop",
            settings(),
        );
        assert_eq!(producer.produce(sample_appointment()).await, "See you Thursday, Ana!");
    }

    #[tokio::test]
    async fn failures_fall_back_to_template() {
        let template = TemplateProducer::new("Shop").render(&sample_appointment());

        for generator in [
            ScriptedGenerator::failing(),
            ScriptedGenerator::replying("   "),
            ScriptedGenerator::stalled(),
        ] {
            let producer = GenerativeProducer::new(Arc::new(generator), "Shop", settings());
            assert_eq!(producer.produce(sample_appointment()).await, template);
        }
    }

    #[test]
    fn missing_key_selects_template() {
        let producer = producer_from_config(&GenerationConfig::default(), "Shop");
        let text = tokio_test::block_on(producer.produce(sample_appointment()));
        assert!(text.ends_with("Thank you for choosing Shop."));
    }
}
