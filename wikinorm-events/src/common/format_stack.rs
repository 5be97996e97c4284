//! Inline style bookkeeping: the format stack and its lazy close reconciliation.
//!
//! # The Problem
//!
//! Wiki grammars emit a format-open/format-close pair around *every* inline run,
//! even when nothing changes between two adjacent words:
//!
//! ```text
//! BeginFormat{strong} Word(a) EndFormat{strong} BeginFormat{strong} Word(b) EndFormat{strong}
//! ```
//!
//! Translating that eagerly would produce a close/reopen pair between `a` and `b`.
//!
//! # The Algorithm
//!
//! 1. A format-close is never applied immediately. It is remembered as the
//!    *pending close*.
//! 2. The pending close is resolved at the next flush point: any content or block
//!    boundary (full close), or the next format-open (partial close).
//! 3. On a partial close the new format acts as a *keep set*. Only
//!    `pending − keep` has to close. Scopes are popped from the top, one
//!    end-format per pop, until every style and parameter to close has been
//!    popped.
//! 4. The keep set then shrinks by everything still open below the popping
//!    frontier; whatever remains is opened as new scopes.
//!
//! Each scope holds at most one style so that a later partial close can take off
//! exactly one style without disturbing the others.

use crate::ir::events::{Event, Format};
use crate::ir::parameters::Parameters;
use crate::ir::raw::{WikiFormat, WikiParameter, WikiStyle};
use crate::listener::Listener;
use std::collections::{HashMap, HashSet};

/// Fixed mapping from grammar style kinds to canonical formats.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: HashMap<WikiStyle, Format>,
}

impl StyleTable {
    pub fn new() -> Self {
        let styles = HashMap::from([
            (WikiStyle::Code, Format::Monospace),
            (WikiStyle::Em, Format::Italic),
            (WikiStyle::Del, Format::Strikeout),
            (WikiStyle::Ins, Format::Underline),
            (WikiStyle::Mono, Format::Monospace),
            (WikiStyle::Strike, Format::Strikeout),
            (WikiStyle::Strong, Format::Bold),
            (WikiStyle::Sub, Format::Subscript),
            (WikiStyle::Sup, Format::Superscript),
            (WikiStyle::Tt, Format::Monospace),
            // No canonical counterpart; the boundary is kept, the look is not.
            (WikiStyle::Big, Format::None),
            (WikiStyle::Cite, Format::None),
            (WikiStyle::Ref, Format::None),
            (WikiStyle::Small, Format::None),
        ]);
        Self { styles }
    }

    /// Unmapped styles degrade to [`Format::None`].
    pub fn convert(&self, style: &WikiStyle) -> Format {
        self.styles.get(style).copied().unwrap_or(Format::None)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WikiStyle, &Format)> {
        self.styles.iter()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One open unit of inline styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleScope {
    pub style: Option<WikiStyle>,
    pub params: Vec<WikiParameter>,
}

impl StyleScope {
    fn format(&self, table: &StyleTable) -> Format {
        self.style
            .as_ref()
            .map_or(Format::None, |style| table.convert(style))
    }
}

/// Stack of open style scopes plus the pending close.
#[derive(Debug, Default)]
pub struct FormatStack {
    scopes: Vec<StyleScope>,
    pending_close: Option<WikiFormat>,
}

impl FormatStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scopes(&self) -> &[StyleScope] {
        &self.scopes
    }

    pub fn pending_close(&self) -> Option<&WikiFormat> {
        self.pending_close.as_ref()
    }

    /// Handles a format-open: reconciles the pending close against `format`, then
    /// opens whatever part of `format` is not already in force.
    pub fn open(&mut self, format: &WikiFormat, table: &StyleTable, sink: &mut dyn Listener) {
        if format.is_empty() {
            return;
        }

        let mut styles = format.styles.clone();
        let mut params = format.params.clone();
        self.reconcile(Some((&mut styles, &mut params)), table, sink);

        if styles.is_empty() && params.is_empty() {
            return;
        }

        let parameters = Parameters::from(params.as_slice());
        if styles.is_empty() {
            sink.on_event(Event::StartFormat {
                format: Format::None,
                parameters,
            });
            self.scopes.push(StyleScope { style: None, params });
            return;
        }

        // Only the first style carries the parameter set.
        for (index, style) in styles.into_iter().enumerate() {
            let (scope_params, event_params) = if index == 0 {
                (params.clone(), parameters.clone())
            } else {
                (Vec::new(), Parameters::new())
            };
            sink.on_event(Event::StartFormat {
                format: table.convert(&style),
                parameters: event_params,
            });
            self.scopes.push(StyleScope {
                style: Some(style),
                params: scope_params,
            });
        }
    }

    /// Records a format-close. Nothing is emitted until the next flush.
    pub fn request_close(&mut self, format: WikiFormat) {
        if !format.is_empty() {
            self.pending_close = Some(format);
        }
    }

    /// Applies the pending close in full.
    pub fn flush(&mut self, table: &StyleTable, sink: &mut dyn Listener) {
        self.reconcile(None, table, sink);
    }

    /// Closes every scope above `depth`, regardless of pending closes.
    pub fn close_above(&mut self, depth: usize, table: &StyleTable, sink: &mut dyn Listener) {
        while self.scopes.len() > depth {
            if let Some(scope) = self.scopes.pop() {
                emit_end(&scope, table, sink);
            }
        }
    }

    /// Whether the pending close, reconciled against `keep`, only closes scopes that
    /// are actually open. Reconciling when this is false underflows the stack.
    pub fn can_reconcile(&self, keep: Option<&WikiFormat>) -> bool {
        let Some(pending) = &self.pending_close else {
            return true;
        };
        let (mut styles, mut params) = to_close(
            pending,
            keep.map(|format| (format.styles.as_slice(), format.params.as_slice())),
        );
        for scope in self.scopes.iter().rev() {
            if styles.is_empty() && params.is_empty() {
                break;
            }
            if let Some(style) = &scope.style {
                styles.remove(style);
            }
            for param in &scope.params {
                params.remove(param);
            }
        }
        styles.is_empty() && params.is_empty()
    }

    fn reconcile(
        &mut self,
        keep: Option<(&mut Vec<WikiStyle>, &mut Vec<WikiParameter>)>,
        table: &StyleTable,
        sink: &mut dyn Listener,
    ) {
        let Some(pending) = self.pending_close.take() else {
            return;
        };

        let (mut styles_to_close, mut params_to_close) = to_close(
            &pending,
            keep.as_ref().map(|(styles, params)| (styles.as_slice(), params.as_slice())),
        );

        while !styles_to_close.is_empty() || !params_to_close.is_empty() {
            let scope = self.scopes.pop().unwrap_or_else(|| {
                panic!(
                    "format stack underflow: closing {styles_to_close:?} {params_to_close:?} with no open scope"
                )
            });
            if let Some(style) = &scope.style {
                styles_to_close.remove(style);
            }
            for param in &scope.params {
                params_to_close.remove(param);
            }
            emit_end(&scope, table, sink);
        }

        if let Some((keep_styles, keep_params)) = keep {
            for scope in &self.scopes {
                if let Some(style) = &scope.style {
                    keep_styles.retain(|kept| kept != style);
                }
                keep_params.retain(|kept| !scope.params.contains(kept));
            }
        }

        log::trace!("format stack reconciled, {} scope(s) open", self.scopes.len());
    }
}

/// `pending − keep`, or all of `pending` without a keep set.
fn to_close(
    pending: &WikiFormat,
    keep: Option<(&[WikiStyle], &[WikiParameter])>,
) -> (HashSet<WikiStyle>, HashSet<WikiParameter>) {
    match keep {
        Some((keep_styles, keep_params)) => (
            pending
                .styles
                .iter()
                .filter(|style| !keep_styles.contains(style))
                .cloned()
                .collect(),
            pending
                .params
                .iter()
                .filter(|param| !keep_params.contains(param))
                .cloned()
                .collect(),
        ),
        None => (
            pending.styles.iter().cloned().collect(),
            pending.params.iter().cloned().collect(),
        ),
    }
}

fn emit_end(scope: &StyleScope, table: &StyleTable, sink: &mut dyn Listener) {
    sink.on_event(Event::EndFormat {
        format: scope.format(table),
        parameters: Parameters::from(scope.params.as_slice()),
    });
}
