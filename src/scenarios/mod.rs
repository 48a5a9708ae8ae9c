//! Request-and-assert procedures for each scenario family.
//!
//! Every function performs its own HTTP calls and returns `Err(Failure)` on
//! the first violated expectation.

pub mod product;

use tracing::debug;

use crate::expected::ExpectedValues;
use crate::http::{HttpClient, HttpResponse, RequestInput};
use crate::sampler::ItemId;
use crate::testing::{CheckResult, Failure};

/// Payload sent by the wrong-method scenario.
pub const EMPTY_PAYLOAD: &str = "{}";

/// Everything a scenario needs to reach the service.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioContext<'a> {
    pub client: &'a HttpClient,
    pub base_url: &'a str,
    pub expected: &'a ExpectedValues,
}

impl ScenarioContext<'_> {
    pub fn item_url(&self, segment: impl std::fmt::Display) -> String {
        format!("{}/{segment}", self.base_url)
    }

    async fn exchange(&self, request: &RequestInput) -> CheckResult<HttpResponse> {
        Ok(self.client.send(request.clone()).await?)
    }

    fn expect_status(
        &self,
        request: &RequestInput,
        response: &HttpResponse,
        accepted: &[u16],
    ) -> CheckResult {
        if accepted.contains(&response.status) {
            return Ok(());
        }
        let expected = if accepted.len() == 1 {
            accepted[0].to_string()
        } else {
            format!("{accepted:?}")
        };
        Err(Failure::with_response(
            format!("Expected status {expected}, but got {}", response.status),
            request,
            expected,
            response,
            self.expected.status_ok,
        ))
    }
}

/// Valid id: OK status, JSON content type, every schema key, matching id.
pub async fn structure_sanity(ctx: ScenarioContext<'_>, id: ItemId) -> CheckResult {
    let request = RequestInput::get(ctx.item_url(id));
    let response = ctx.exchange(&request).await?;

    ctx.expect_status(&request, &response, &[ctx.expected.status_ok])?;

    let content_type = response.header("content-type").unwrap_or_default();
    if content_type != ctx.expected.content_type_json {
        return Err(Failure::new(format!(
            "Expected Content-Type `{}`, but got `{content_type}`",
            ctx.expected.content_type_json
        )));
    }

    let body = response.json()?;
    product::check_structure(&body, ctx.expected, id)
}

/// Valid id: well-typed fields, then the image URL must answer OK.
pub async fn data_type_integrity(ctx: ScenarioContext<'_>, id: ItemId) -> CheckResult {
    let request = RequestInput::get(ctx.item_url(id));
    let response = ctx.exchange(&request).await?;
    let body = response.json()?;

    let image_url = product::check_data_types(&body, ctx.expected)?;

    debug!(id, image_url, "checking image reachability");
    let image_request = RequestInput::get(image_url);
    let image_response = ctx.exchange(&image_request).await?;
    if image_response.status != ctx.expected.status_ok {
        return Err(Failure::new(format!(
            "Broken image URL: {image_url} (status {})",
            image_response.status
        )));
    }

    Ok(())
}

/// Unknown or malformed id: NOT_FOUND or BAD_REQUEST and the empty-result text.
pub async fn invalid_id(ctx: ScenarioContext<'_>, raw_id: &str) -> CheckResult {
    let request = RequestInput::get(ctx.item_url(raw_id));
    let response = ctx.exchange(&request).await?;

    ctx.expect_status(&request, &response, &ctx.expected.invalid_id_statuses())?;

    let text = response.text();
    if text != ctx.expected.invalid_id_text {
        return Err(Failure::new(format!(
            "Expected body `{}`, but got `{text}`",
            ctx.expected.invalid_id_text
        )));
    }

    Ok(())
}

/// POST with an empty payload to a single item: METHOD_NOT_ALLOWED and the
/// error text naming the id.
pub async fn wrong_method(ctx: ScenarioContext<'_>, id: ItemId) -> CheckResult {
    let request = RequestInput::post(ctx.item_url(id), EMPTY_PAYLOAD);
    let response = ctx.exchange(&request).await?;

    ctx.expect_status(&request, &response, &[ctx.expected.status_method_not_allowed])?;

    let expected_text = ctx.expected.wrong_method_text(id);
    let text = response.text();
    if !text.contains(&expected_text) {
        return Err(Failure::new(format!(
            "Expected error message `{expected_text}`, but got `{text}`"
        )));
    }

    Ok(())
}
