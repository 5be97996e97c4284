//! Output sinks for normalized events.
//!
//! A [`Listener`] receives [`Event`]s one at a time. The normalizer does not write to a
//! fixed listener: it writes to the top of a [`ListenerStack`], so a buffering sink can
//! take over the stream for a while (header capture) and hand it back afterwards by a
//! plain pop.

use crate::ir::events::Event;
use std::collections::VecDeque;

/// Receives normalized events.
pub trait Listener {
    fn on_event(&mut self, event: Event);
}

impl Listener for Vec<Event> {
    fn on_event(&mut self, event: Event) {
        self.push(event);
    }
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn on_event(&mut self, event: Event) {
        (**self).on_event(event);
    }
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn on_event(&mut self, event: Event) {
        (**self).on_event(event);
    }
}

/// FIFO buffer that can be replayed into another listener.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sends every buffered event, in arrival order, to `listener`.
    pub fn consume_events(mut self, listener: &mut dyn Listener) {
        while let Some(event) = self.events.pop_front() {
            listener.on_event(event);
        }
    }
}

impl Listener for EventQueue {
    fn on_event(&mut self, event: Event) {
        self.events.push_back(event);
    }
}

/// Accumulates the visible text of a stream and ignores markup.
///
/// Links and images without label children contribute their raw reference, since
/// that is what a reader would see.
#[derive(Debug, Default)]
pub struct PlainTextListener {
    text: String,
    references: Vec<(String, bool)>,
}

impl PlainTextListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn mark_content(&mut self) {
        if let Some((_, has_children)) = self.references.last_mut() {
            *has_children = true;
        }
    }
}

impl Listener for PlainTextListener {
    fn on_event(&mut self, event: Event) {
        match event {
            Event::Word(word) => {
                self.mark_content();
                self.text.push_str(&word);
            }
            Event::Space | Event::NewLine => {
                self.mark_content();
                self.text.push(' ');
            }
            Event::SpecialSymbol(symbol) => {
                self.mark_content();
                self.text.push(symbol);
            }
            Event::Verbatim {
                content,
                inline: true,
                ..
            } => {
                self.mark_content();
                self.text.push_str(&content);
            }
            Event::StartLink { reference, .. } | Event::StartImage { reference, .. } => {
                self.mark_content();
                self.references.push((reference.raw().to_string(), false));
            }
            Event::EndLink { .. } | Event::EndImage { .. } => {
                if let Some((raw, false)) = self.references.pop() {
                    self.text.push_str(&raw);
                }
            }
            _ => {}
        }
    }
}

/// Tees every event to two listeners, `first` then `second`.
///
/// Nest composites to fan out further: `CompositeListener<A, CompositeListener<B, C>>`.
#[derive(Debug, Default)]
pub struct CompositeListener<A, B> {
    first: A,
    second: B,
}

impl<A: Listener, B: Listener> CompositeListener<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Listener, B: Listener> Listener for CompositeListener<A, B> {
    fn on_event(&mut self, event: Event) {
        self.first.on_event(event.clone());
        self.second.on_event(event);
    }
}

/// The sink a header's content is routed to until its id is known.
pub type HeaderCapture = CompositeListener<EventQueue, PlainTextListener>;

impl HeaderCapture {
    pub fn capture() -> Self {
        CompositeListener::new(EventQueue::new(), PlainTextListener::new())
    }
}

enum Frame<'a> {
    Sink(Box<dyn Listener + 'a>),
    Capture(HeaderCapture),
}

impl Frame<'_> {
    fn listener(&mut self) -> &mut dyn Listener {
        match self {
            Frame::Sink(listener) => listener.as_mut(),
            Frame::Capture(capture) => capture,
        }
    }
}

/// Stack of sinks; all events go to the top.
///
/// The bottom frame is the caller's listener and can never be popped.
pub struct ListenerStack<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> ListenerStack<'a> {
    pub fn new(base: impl Listener + 'a) -> Self {
        Self {
            frames: vec![Frame::Sink(Box::new(base))],
        }
    }

    /// The active destination.
    pub fn top(&mut self) -> &mut dyn Listener {
        // The base frame is never popped, so the stack is never empty.
        let last = self.frames.len() - 1;
        self.frames[last].listener()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, listener: impl Listener + 'a) {
        self.frames.push(Frame::Sink(Box::new(listener)));
    }

    pub fn push_capture(&mut self) {
        self.frames.push(Frame::Capture(HeaderCapture::capture()));
    }

    /// Removes the top listener, returning it.
    ///
    /// # Panics
    ///
    /// When only the base listener is left.
    pub fn pop(&mut self) -> Box<dyn Listener + 'a> {
        assert!(self.frames.len() > 1, "listener stack underflow");
        match self.frames.pop() {
            Some(Frame::Sink(listener)) => listener,
            Some(Frame::Capture(capture)) => Box::new(capture),
            None => unreachable!("listener stack is never empty"),
        }
    }

    /// Removes the header capture on top of the stack.
    ///
    /// # Panics
    ///
    /// When the top of the stack is not a header capture.
    pub fn pop_capture(&mut self) -> HeaderCapture {
        assert!(self.frames.len() > 1, "listener stack underflow");
        match self.frames.pop() {
            Some(Frame::Capture(capture)) => capture,
            _ => panic!("header end without a matching header capture"),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame, Frame::Capture(_)))
    }
}
