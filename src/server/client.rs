use anyhow::{Context, Result};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tera::{Context as TeraContext, Tera};

const CLIENT_TEMPLATE: &str = include_str!("templates/client.html.tera");

pub async fn run_client(addr: String, api_base: String) -> Result<()> {
    let html = Arc::new(render_client_html(&api_base)?);
    let app = Router::new().route(
        "/",
        get({
            let html = html.clone();
            move || {
                let html = html.clone();
                async move { Html((*html).clone()) }
            }
        }),
    );
    tracing::info!(addr = %addr, api_base = %api_base, "starting analyzer client page");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| "failed to bind client address")?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn render_client_html(api_base: &str) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("api_base_json", &serde_json::to_string(api_base)?);
    Tera::one_off(CLIENT_TEMPLATE, &context, false)
        .with_context(|| "failed to render client template")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_html_embeds_the_api_base() {
        let html = render_client_html("http://127.0.0.1:8787").unwrap();
        assert!(html.contains("\"http://127.0.0.1:8787\""));
        assert!(html.contains("Japanese Content Analyzer"));
    }
}
