//! Lazily evaluated element queries
//!
//! A `Locator` is a chain of query segments. Nothing is resolved when it is
//! built; every action compiles the chain into a JavaScript resolver and runs
//! it against the live DOM, so re-renders between steps are harmless.
//!
//! Actions auto-wait: they poll until the target is attached, unique, visible
//! and enabled, or until the action timeout expires.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::{Page, POLL_INTERVAL};
use crate::error::{E2eError, E2eResult};

/// Text matching rule for names, placeholders and text queries.
///
/// Non-exact matching is a case-insensitive substring test on
/// whitespace-normalized text; exact matching compares the full normalized
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    pub value: String,
    pub exact: bool,
}

impl TextMatch {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: true,
        }
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exact: false,
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{:?}", self.value)
        } else {
            write!(f, "/{}/i", self.value)
        }
    }
}

/// One step of a query chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Css { selector: String },
    TestId { id: String },
    Role { role: String, name: Option<TextMatch> },
    Placeholder { text: TextMatch },
    Text { text: TextMatch },
    /// Keep elements whose text contains `text` (case-sensitive)
    HasText { text: String },
    /// Keep the element at `index`; negative counts from the end
    Nth { index: i64 },
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Css { selector } => write!(f, "locator({:?})", selector),
            Segment::TestId { id } => write!(f, "get_by_test_id({:?})", id),
            Segment::Role { role, name: Some(name) } => {
                write!(f, "get_by_role({:?}, name={})", role, name)
            }
            Segment::Role { role, name: None } => write!(f, "get_by_role({:?})", role),
            Segment::Placeholder { text } => write!(f, "get_by_placeholder({})", text),
            Segment::Text { text } => write!(f, "get_by_text({})", text),
            Segment::HasText { text } => write!(f, "filter(has_text={:?})", text),
            Segment::Nth { index: 0 } => write!(f, "first()"),
            Segment::Nth { index: -1 } => write!(f, "last()"),
            Segment::Nth { index } => write!(f, "nth({})", index),
        }
    }
}

/// Shared resolver. `__resolve(segments, testIdAttr)` returns the matching
/// elements in document order.
const RESOLVER_JS: &str = r#"
const __norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
const __match = (actual, m) => {
  const a = __norm(actual);
  return m.exact ? a === __norm(m.value) : a.toLowerCase().includes(__norm(m.value).toLowerCase());
};
const __rendered = (el) => {
  const r = el.getBoundingClientRect();
  const s = getComputedStyle(el);
  return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';
};
const __roles = {
  button: 'button, input[type=button], input[type=submit], input[type=reset], [role=button]',
  link: 'a[href], [role=link]',
  textbox: 'input:not([type]), input[type=text], input[type=email], input[type=password], input[type=search], input[type=tel], input[type=url], textarea, [role=textbox]',
  combobox: 'select, [role=combobox]',
  option: 'option, [role=option]',
  checkbox: 'input[type=checkbox], [role=checkbox]',
  heading: 'h1, h2, h3, h4, h5, h6, [role=heading]',
};
const __name = (el) => {
  const label = el.getAttribute('aria-label');
  if (label) return label;
  const by = el.getAttribute('aria-labelledby');
  if (by) return by.split(/\s+/).map((id) => { const t = document.getElementById(id); return t ? t.textContent : ''; }).join(' ');
  if (el.tagName === 'INPUT') {
    const type = (el.getAttribute('type') || '').toLowerCase();
    if (['button', 'submit', 'reset'].includes(type)) return el.value || (type === 'submit' ? 'Submit' : '');
    return el.getAttribute('placeholder') || '';
  }
  return el.textContent;
};
const __query = (root, seg, attr) => {
  switch (seg.kind) {
    case 'css':
      return Array.from(root.querySelectorAll(seg.selector));
    case 'test_id':
      return Array.from(root.querySelectorAll('[' + attr + '="' + CSS.escape(seg.id) + '"]'));
    case 'role': {
      const sel = __roles[seg.role] || ('[role="' + CSS.escape(seg.role) + '"]');
      return Array.from(root.querySelectorAll(sel))
        .filter((el) => __rendered(el))
        .filter((el) => !seg.name || __match(__name(el), seg.name));
    }
    case 'placeholder':
      return Array.from(root.querySelectorAll('input[placeholder], textarea[placeholder]'))
        .filter((el) => __match(el.getAttribute('placeholder'), seg.text));
    case 'text': {
      const hits = Array.from(root.querySelectorAll('*'))
        .filter((el) => !['SCRIPT', 'STYLE'].includes(el.tagName))
        .filter((el) => __match(el.textContent, seg.text));
      return hits.filter((el) => !hits.some((other) => other !== el && el.contains(other)));
    }
    default:
      throw new Error('unknown segment ' + seg.kind);
  }
};
const __resolve = (segments, attr) => {
  let current = null;
  for (const seg of segments) {
    if (seg.kind === 'nth') {
      const list = current || [];
      const i = seg.index < 0 ? list.length + seg.index : seg.index;
      current = i >= 0 && i < list.length ? [list[i]] : [];
    } else if (seg.kind === 'has_text') {
      current = (current || []).filter((el) => (el.textContent || '').includes(seg.text));
    } else {
      const seen = new Set();
      for (const root of current || [document]) {
        for (const el of __query(root, seg, attr)) seen.add(el);
      }
      current = Array.from(seen);
    }
  }
  return current || [];
};
"#;

/// Outcome reported by an action script
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ActionState {
    Ok,
    NotFound,
    Strict { count: usize },
    Hidden,
    Disabled,
    NotEditable,
    NoOption,
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionState::Ok => write!(f, "ok"),
            ActionState::NotFound => write!(f, "element not found"),
            ActionState::Strict { count } => write!(f, "{} elements matched", count),
            ActionState::Hidden => write!(f, "element not visible"),
            ActionState::Disabled => write!(f, "element disabled"),
            ActionState::NotEditable => write!(f, "element not editable"),
            ActionState::NoOption => write!(f, "option not present"),
        }
    }
}

/// Interactions a locator can perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    Fill(String),
    SelectOption(String),
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Fill(_) => "fill",
            Action::SelectOption(_) => "select_option",
        }
    }

    // Body runs with `el` bound to the single visible target.
    fn body(&self) -> String {
        match self {
            Action::Click => "el.click();".to_string(),
            Action::Fill(value) => format!(
                r#"const tag = el.tagName;
  if (!(tag === 'INPUT' || tag === 'TEXTAREA' || el.isContentEditable) || el.readOnly) return {{ state: 'not_editable' }};
  const value = {value};
  el.focus();
  if (el.isContentEditable) {{
    el.textContent = value;
  }} else {{
    const proto = tag === 'INPUT' ? HTMLInputElement.prototype : HTMLTextAreaElement.prototype;
    Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
  }}
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));"#,
                value = js_string(value)
            ),
            Action::SelectOption(value) => format!(
                r#"if (el.tagName !== 'SELECT') return {{ state: 'not_editable' }};
  const value = {value};
  if (!Array.from(el.options).some((o) => o.value === value)) return {{ state: 'no_option' }};
  Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set.call(el, value);
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));"#,
                value = js_string(value)
            ),
        }
    }
}

/// Source of per-call action tokens
static NEXT_ACTION: AtomicU64 = AtomicU64::new(1);

/// Action script body, run with `els` bound to the resolved elements.
///
/// The document is stamped with `token` once the action is done. A re-run
/// that finds the stamp reports `ok` without acting again, so an evaluation
/// whose result was lost never repeats a click.
fn action_body(action: &Action, token: u64) -> String {
    format!(
        r#"if (window.__e2eAction === {token}) return {{ state: 'ok' }};
  if (els.length === 0) return {{ state: 'not_found' }};
  if (els.length > 1) return {{ state: 'strict', count: els.length }};
  const el = els[0];
  el.scrollIntoView({{ block: 'center', inline: 'center' }});
  if (!__rendered(el)) return {{ state: 'hidden' }};
  if (el.disabled) return {{ state: 'disabled' }};
  {body}
  window.__e2eAction = {token};
  return {{ state: 'ok' }};"#,
        token = token,
        body = action.body()
    )
}

fn js_string(value: &str) -> String {
    // A JSON string literal is a valid JS string literal.
    serde_json::Value::String(value.to_string()).to_string()
}

/// Query descriptor bound to a page
#[derive(Debug, Clone)]
pub struct Locator {
    page: Page,
    segments: Vec<Segment>,
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

impl Locator {
    pub(crate) fn new(page: Page, segment: Segment) -> Self {
        Self {
            page,
            segments: vec![segment],
        }
    }

    fn chain(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            page: self.page.clone(),
            segments,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    // ==================== Refinement ====================

    pub fn locator(&self, css: &str) -> Self {
        self.chain(Segment::Css {
            selector: css.to_string(),
        })
    }

    pub fn get_by_test_id(&self, id: &str) -> Self {
        self.chain(Segment::TestId { id: id.to_string() })
    }

    pub fn get_by_role(&self, role: &str, name: Option<TextMatch>) -> Self {
        self.chain(Segment::Role {
            role: role.to_string(),
            name,
        })
    }

    pub fn get_by_text(&self, text: TextMatch) -> Self {
        self.chain(Segment::Text { text })
    }

    pub fn nth(&self, index: i64) -> Self {
        self.chain(Segment::Nth { index })
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn last(&self) -> Self {
        self.nth(-1)
    }

    /// Narrow to elements whose text contains `text`, case-sensitively
    pub fn filter_has_text(&self, text: &str) -> Self {
        self.chain(Segment::HasText {
            text: text.to_string(),
        })
    }

    // ==================== Script compilation ====================

    fn resolve_expr(&self) -> E2eResult<String> {
        let segments = serde_json::to_string(&self.segments)?;
        let attr = js_string(&self.page.settings().test_id_attribute);
        Ok(format!("__resolve({}, {})", segments, attr))
    }

    /// Script returning a value computed from `els`, the resolved elements
    pub(crate) fn query_script(&self, body: &str) -> E2eResult<String> {
        Ok(format!(
            "(() => {{\n{}\nconst els = {};\n{}\n}})()",
            RESOLVER_JS,
            self.resolve_expr()?,
            body
        ))
    }

    /// Script performing `action` on the single visible target
    pub(crate) fn action_script(&self, action: &Action, token: u64) -> E2eResult<String> {
        self.query_script(&action_body(action, token))
    }

    // ==================== Actions ====================

    async fn perform(&self, action: Action) -> E2eResult<()> {
        let token = NEXT_ACTION.fetch_add(1, Ordering::Relaxed);
        let script = self.action_script(&action, token)?;
        let timeout = self.page.timeouts().action();
        let deadline = tokio::time::Instant::now() + timeout;

        debug!("{} {}", action.verb(), self);
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let attempt = tokio::time::timeout(
                remaining.max(Duration::from_millis(1)),
                self.page.evaluate::<ActionState>(&script),
            )
            .await;

            let last = match attempt {
                Ok(Ok(ActionState::Ok)) => return Ok(()),
                Ok(Ok(ActionState::Strict { count })) => {
                    return Err(E2eError::StrictModeViolation {
                        locator: self.to_string(),
                        count,
                    })
                }
                Ok(Ok(state)) => state.to_string(),
                // Navigation in flight; retry against the new document.
                Ok(Err(e)) => e.to_string(),
                Err(_) => "evaluation timed out".to_string(),
            };

            if tokio::time::Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    what: format!("{} {}", action.verb(), self),
                    state: last,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn click(&self) -> E2eResult<()> {
        self.perform(Action::Click).await
    }

    pub async fn fill(&self, value: &str) -> E2eResult<()> {
        self.perform(Action::Fill(value.to_string())).await
    }

    pub async fn select_option(&self, value: &str) -> E2eResult<()> {
        self.perform(Action::SelectOption(value.to_string())).await
    }

    // ==================== Queries (no waiting) ====================

    /// Number of currently matching elements
    pub async fn count(&self) -> E2eResult<usize> {
        let script = self.query_script("return els.length;")?;
        self.page.evaluate(&script).await
    }

    /// Raw `textContent` of every matching element
    pub async fn all_text_contents(&self) -> E2eResult<Vec<String>> {
        let script = self.query_script("return els.map((el) => el.textContent || '');")?;
        self.page.evaluate(&script).await
    }

    /// Whitespace-normalized text of the first match, if any
    pub async fn text_content(&self) -> E2eResult<Option<String>> {
        // `null` does not survive the CDP round trip, so wrap the value.
        let script = self.query_script("return els.slice(0, 1).map((el) => __norm(el.textContent));")?;
        let first: Vec<String> = self.page.evaluate(&script).await?;
        Ok(first.into_iter().next())
    }

    /// Whether the first match is rendered
    pub async fn is_visible(&self) -> E2eResult<bool> {
        let script = self.query_script("return els.length > 0 && __rendered(els[0]);")?;
        self.page.evaluate(&script).await
    }
}
