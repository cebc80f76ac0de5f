use crate::graph::node::GraphNode;

/// Factory for creating voices with a specific patch/sound design
///
/// This is the "instrument design" layer: configure the sound once, then the
/// synthesis engine asks the factory for a fresh graph for every string of
/// every strum.
pub trait VoiceFactory: Send {
    type Voice: GraphNode;

    fn create_voice(&self) -> Self::Voice;
}

impl<F, T> VoiceFactory for F
where
    F: Fn() -> T + Send,
    T: GraphNode,
{
    type Voice = T;

    fn create_voice(&self) -> Self::Voice {
        self()
    }
}

/// Type-erased factory, so engines with different patches share one type.
pub type BoxedFactory = Box<dyn VoiceFactory<Voice = Box<dyn GraphNode>>>;

/// Erase the concrete graph type produced by `factory`.
pub fn boxed<F>(factory: F) -> BoxedFactory
where
    F: VoiceFactory + 'static,
    F::Voice: 'static,
{
    Box::new(move || -> Box<dyn GraphNode> { Box::new(factory.create_voice()) })
}
