//! Built-in HTML templates for ability lists and the settings form.
//!
//! Markup carries `data-actor-id` / `data-owned-item-id` attributes on each
//! entry and `data-message-id` is added by the chat surface, so a host
//! adapter can map a checkbox change back to a reveal request.

use std::fmt::Write as _;

use async_trait::async_trait;
use veilkeep_domain::{IdentifiabilitySetting, IdentifiableAbility};

use super::ports::{RenderError, TemplateContext, TemplateRef, TemplateRenderer};

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTemplates;

impl HtmlTemplates {
    pub fn new() -> Self {
        Self
    }

    fn ability_list(items: &[IdentifiableAbility]) -> Result<String, std::fmt::Error> {
        let mut html = String::from("<ol class=\"veilkeep ability-list\">");
        for item in items {
            write!(
                html,
                "<li class=\"ability\" data-actor-id=\"{}\" data-owned-item-id=\"{}\">",
                item.actor_id, item.owned_item_id
            )?;
            write!(
                html,
                "<input type=\"checkbox\" class=\"knowledge-check identifiable\"{}{}/>",
                if item.checked { " checked" } else { "" },
                if item.disabled { " disabled" } else { "" }
            )?;
            if item.show_img && !item.img.is_empty() {
                write!(html, "<img src=\"{}\"/>", escape(&item.img))?;
            }
            write!(
                html,
                "<span class=\"name\">{}</span>",
                escape(item.display_name())
            )?;
            if item.show_html_description {
                // Item descriptions are trusted host markup
                write!(
                    html,
                    "<div class=\"description\">{}</div>",
                    item.html_description
                )?;
            }
            html.push_str("</li>");
        }
        html.push_str("</ol>");
        Ok(html)
    }

    fn setting_form(setting: &IdentifiabilitySetting) -> Result<String, std::fmt::Error> {
        let mut html = String::from("<form class=\"veilkeep identifiability-settings\">");
        write!(
            html,
            "<label><input type=\"checkbox\" name=\"isIdentifiable\"{}/> Identifiable</label>",
            if setting.is_identifiable { " checked" } else { "" }
        )?;
        write!(
            html,
            "<label><input type=\"checkbox\" name=\"isIdentified\"{}{}/> Identified</label>",
            if setting.is_identified { " checked" } else { "" },
            if setting.is_identifiable { "" } else { " disabled" }
        )?;
        write!(
            html,
            "<label>Unidentified name <input type=\"text\" name=\"unidentifiedName\" value=\"{}\"/></label>",
            escape(setting.unidentified_name.as_deref().unwrap_or_default())
        )?;
        html.push_str("</form>");
        Ok(html)
    }
}

#[async_trait]
impl TemplateRenderer for HtmlTemplates {
    async fn render(
        &self,
        template: TemplateRef,
        context: TemplateContext,
    ) -> Result<String, RenderError> {
        let rendered = match (template, &context) {
            (TemplateRef::AbilityList, TemplateContext::AbilityList { items }) => {
                Self::ability_list(items)
            }
            (TemplateRef::SettingForm, TemplateContext::SettingForm(setting)) => {
                Self::setting_form(setting)
            }
            _ => {
                return Err(RenderError::Failed {
                    template: template.name(),
                    message: "context does not match template".to_string(),
                })
            }
        };
        rendered.map_err(|e| RenderError::Failed {
            template: template.name(),
            message: e.to_string(),
        })
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
