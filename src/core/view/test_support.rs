//=========================================================================
// Test Support
//=========================================================================
//
// Recording view shared by the view-system unit tests.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use super::{AssetLoad, LoadingIndicator, TransitionConfig, View};
use crate::core::globals::GlobalContext;
use crate::core::input::{InputEvent, InputEventType, InputListener};
use crate::core::render::{Canvas, TextStyle};

pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Journal::default()
}

type Reaction = Box<dyn FnMut(&mut GlobalContext)>;

/// View that logs `"<name>:<hook>"` for every hook it receives and can
/// run a scripted reaction from any hook.
pub(crate) struct Probe {
    name: &'static str,
    journal: Journal,
    config: TransitionConfig,
    load: Option<AssetLoad>,
    interests: Vec<InputEventType>,
    custom_indicator: bool,
    reactions: Vec<(&'static str, Reaction)>,
}

impl Probe {
    pub(crate) fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Rc::clone(journal),
            config: TransitionConfig::default(),
            load: None,
            interests: Vec::new(),
            custom_indicator: false,
            reactions: Vec::new(),
        }
    }

    pub(crate) fn instant(self) -> Self {
        self.with_config(TransitionConfig::INSTANT)
    }

    pub(crate) fn with_config(mut self, config: TransitionConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn with_load(mut self, load: AssetLoad) -> Self {
        self.load = Some(load);
        self
    }

    pub(crate) fn listening(mut self, interests: &[InputEventType]) -> Self {
        self.interests = interests.to_vec();
        self
    }

    pub(crate) fn with_custom_indicator(mut self) -> Self {
        self.custom_indicator = true;
        self
    }

    /// Runs `reaction` every time `hook` fires.
    pub(crate) fn on<F>(mut self, hook: &'static str, reaction: F) -> Self
    where
        F: FnMut(&mut GlobalContext) + 'static,
    {
        self.reactions.push((hook, Box::new(reaction)));
        self
    }

    fn record(&mut self, hook: &str, ctx: &mut GlobalContext) {
        self.journal.borrow_mut().push(format!("{}:{}", self.name, hook));
        for (name, reaction) in &mut self.reactions {
            if *name == hook {
                reaction(ctx);
            }
        }
    }
}

impl InputListener for Probe {
    fn input_interests(&self) -> &[InputEventType] {
        &self.interests
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut GlobalContext) {
        let hook = event.kind().name();
        self.record(hook, ctx);
    }
}

impl View for Probe {
    fn transition(&self) -> TransitionConfig {
        self.config
    }

    fn load_assets(&mut self) -> Option<AssetLoad> {
        self.load.take()
    }

    fn draw_loading_indicator(&mut self, canvas: &mut dyn Canvas, _fade: f32) -> LoadingIndicator {
        if !self.custom_indicator {
            return LoadingIndicator::UseDefault;
        }
        canvas.text(&format!("{} loading", self.name), 0.0, 0.0, &TextStyle::default());
        LoadingIndicator::Custom
    }

    fn init(&mut self, ctx: &mut GlobalContext) {
        self.record("init", ctx);
    }

    fn on_dispose(&mut self, ctx: &mut GlobalContext) {
        self.record("dispose", ctx);
    }

    fn on_enable(&mut self, ctx: &mut GlobalContext) {
        self.record("enable", ctx);
    }

    fn on_disable(&mut self, ctx: &mut GlobalContext) {
        self.record("disable", ctx);
    }

    fn on_focus(&mut self, ctx: &mut GlobalContext) {
        self.record("focus", ctx);
    }

    fn on_blur(&mut self, ctx: &mut GlobalContext) {
        self.record("blur", ctx);
    }

    fn update(&mut self, ctx: &mut GlobalContext) {
        self.record("update", ctx);
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        canvas.text(self.name, 0.0, 0.0, &TextStyle::default());
    }
}
