//! Structural HTML rewriting of variant copy.
//!
//! Rules are `(selector, mutations)` pairs applied by a streaming
//! rewriter, so markup outside the targeted elements passes through
//! byte-for-byte and chunk boundaries never change the output.
//!
//! | Selector        | Mutation                                   |
//! |-----------------|--------------------------------------------|
//! | `title`         | inner text ← `pageTitle`                   |
//! | `h1#title`      | inner text ← `title`                       |
//! | `p#description` | inner text ← `description`                 |
//! | `a#url`         | inner text ← `linkText`, `href` ← `linkUrl` |

use crate::content::{ContentTable, VariantContent};
use crate::error::{EdgeError, EdgeResult};
use axum::body::{Body, Bytes};
use axum::response::Response;
use futures::StreamExt;
use lol_html::html_content::{ContentType, Element};
use lol_html::{ElementContentHandlers, HandlerResult, HtmlRewriter, Selector, Settings};
use std::borrow::Cow;
use std::sync::Arc;

/// A single change applied to every element a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace all children with escaped text.
    SetInnerText(String),
    /// Set (or overwrite) one attribute, leaving the others alone.
    SetAttribute { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub selector: String,
    pub mutations: Vec<Mutation>,
}

impl RewriteRule {
    pub fn new(selector: impl Into<String>, mutations: Vec<Mutation>) -> Self {
        Self {
            selector: selector.into(),
            mutations,
        }
    }
}

/// The rule set for one variant's copy.
pub fn rules_for(content: &VariantContent) -> Vec<RewriteRule> {
    vec![
        RewriteRule::new(
            "title",
            vec![Mutation::SetInnerText(content.page_title.clone())],
        ),
        RewriteRule::new("h1#title", vec![Mutation::SetInnerText(content.title.clone())]),
        RewriteRule::new(
            "p#description",
            vec![Mutation::SetInnerText(content.description.clone())],
        ),
        RewriteRule::new(
            "a#url",
            vec![
                Mutation::SetInnerText(content.link_text.clone()),
                Mutation::SetAttribute {
                    name: "href".to_string(),
                    value: content.link_url.clone(),
                },
            ],
        ),
    ]
}

fn apply(el: &mut Element, mutations: &[Mutation]) -> HandlerResult {
    for mutation in mutations {
        match mutation {
            Mutation::SetInnerText(text) => el.set_inner_content(text, ContentType::Text),
            Mutation::SetAttribute { name, value } => el.set_attribute(name, value)?,
        }
    }
    Ok(())
}

/// Run `rules` over an HTML body delivered as arbitrary chunks.
pub fn rewrite_chunks<I, C>(chunks: I, rules: &[RewriteRule]) -> EdgeResult<Vec<u8>>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut handlers = Vec::with_capacity(rules.len());
    for rule in rules {
        let selector: Selector = rule.selector.parse().map_err(|e| {
            EdgeError::Rewrite(format!("invalid selector {:?}: {e}", rule.selector))
        })?;
        let mutations = rule.mutations.as_slice();
        handlers.push((
            Cow::Owned(selector),
            ElementContentHandlers::default().element(move |el| apply(el, mutations)),
        ));
    }

    let mut output = Vec::new();
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );
    for chunk in chunks {
        rewriter
            .write(chunk.as_ref())
            .map_err(|e| EdgeError::Rewrite(e.to_string()))?;
    }
    rewriter.end().map_err(|e| EdgeError::Rewrite(e.to_string()))?;
    Ok(output)
}

/// Rewrites responses using an injected content table.
#[derive(Clone)]
pub struct ContentRewriter {
    table: Arc<ContentTable>,
}

impl ContentRewriter {
    pub fn new(table: Arc<ContentTable>) -> Self {
        Self { table }
    }

    /// Rules for a variant, or `UnknownVariant` when the table has no entry.
    pub fn rules_for_variant(&self, variant_url: &str) -> EdgeResult<Vec<RewriteRule>> {
        self.table
            .get(variant_url)
            .map(rules_for)
            .ok_or_else(|| EdgeError::UnknownVariant(variant_url.to_string()))
    }

    /// Rewrite a complete HTML document in memory.
    pub fn rewrite_html(&self, html: &str, variant_url: &str) -> EdgeResult<String> {
        let rules = self.rules_for_variant(variant_url)?;
        let out = rewrite_chunks([html.as_bytes()], &rules)?;
        String::from_utf8(out).map_err(|e| EdgeError::Rewrite(e.to_string()))
    }

    /// Rewrite the body of `response` for `variant_url`, keeping status
    /// and headers.
    ///
    /// The table lookup happens before the body is touched, so an unknown
    /// variant fails without consuming anything.
    pub async fn transform_response(
        &self,
        response: Response,
        variant_url: &str,
    ) -> EdgeResult<Response> {
        let rules = self.rules_for_variant(variant_url)?;
        rewrite_response(response, &rules).await
    }
}

/// Rewrite the body of `response` with rules resolved ahead of time.
pub async fn rewrite_response(response: Response, rules: &[RewriteRule]) -> EdgeResult<Response> {
    let (parts, body) = response.into_parts();
    let chunks = collect_chunks(body).await?;
    let rewritten = rewrite_chunks(&chunks, rules)?;
    Ok(Response::from_parts(parts, Body::from(rewritten)))
}

async fn collect_chunks(body: Body) -> EdgeResult<Vec<Bytes>> {
    let mut stream = body.into_data_stream();
    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk.map_err(|e| EdgeError::Body(e.to_string()))?);
    }
    Ok(chunks)
}
