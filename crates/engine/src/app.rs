//! Application state and composition.

use std::sync::Arc;

use veilkeep_domain::RuleProfile;

use crate::infrastructure::ports::{
    ActorRepo, ArtifactStore, AuthorityChannel, ChatView, TemplateRenderer,
};
use crate::use_cases::identification::{
    AbilityProjector, AuthorityOperations, ChatArtifactSync, IdentificationUseCases,
    ItemSettings, PrintAbilities, RevealCoordinator, StateStore,
};

/// One participant's application context.
///
/// Built once per participant from its ports and passed to whatever drives
/// it. Authority handlers are registered on the channel at construction;
/// the channel only runs them while this participant holds authority.
pub struct App {
    pub use_cases: UseCases,
    pub channel: Arc<dyn AuthorityChannel>,
}

/// Container for all use cases.
pub struct UseCases {
    pub identification: IdentificationUseCases,
    pub authority: Arc<AuthorityOperations>,
}

impl App {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        renderer: Arc<dyn TemplateRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        view: Arc<dyn ChatView>,
        channel: Arc<dyn AuthorityChannel>,
        profile: RuleProfile,
    ) -> Self {
        let state = Arc::new(StateStore::new(actors.clone(), profile));
        let projector = Arc::new(AbilityProjector::new(actors.clone(), state.clone()));
        let chat = Arc::new(ChatArtifactSync::new(
            projector.clone(),
            renderer.clone(),
            artifacts,
            view,
        ));
        let reveal = Arc::new(RevealCoordinator::new(
            projector.clone(),
            chat.clone(),
            channel.clone(),
        ));
        let print = Arc::new(PrintAbilities::new(
            actors,
            projector.clone(),
            chat.clone(),
            channel.clone(),
        ));
        let settings = Arc::new(ItemSettings::new(state.clone(), renderer, channel.clone()));

        let authority = Arc::new(AuthorityOperations::new(state.clone(), chat.clone()));
        authority.register_all(channel.as_ref());

        Self {
            use_cases: UseCases {
                identification: IdentificationUseCases {
                    state,
                    projector,
                    chat,
                    reveal,
                    print,
                    settings,
                },
                authority,
            },
            channel,
        }
    }

    pub fn is_authority(&self) -> bool {
        self.channel.is_authority()
    }
}
