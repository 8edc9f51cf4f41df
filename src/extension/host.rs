use crate::app::AppState;
use crate::event::AppEvent;
use crate::gallery::LoadRequest;
use crate::history::{LocationExtension, LocationHistory};
use crate::onboarding::{OnboardingExtension, OnboardingState};

use super::traits::Extension;

pub struct ExtensionHost {
    location: LocationHistory,
    onboarding: OnboardingState,
}

impl ExtensionHost {
    pub fn new() -> Self {
        Self::with_onboarding(OnboardingExtension::init_state())
    }

    pub fn with_onboarding(onboarding: OnboardingState) -> Self {
        Self {
            location: LocationExtension::init_state(),
            onboarding,
        }
    }

    pub fn handle_event(&mut self, event: &AppEvent, app: &mut AppState) {
        LocationExtension::handle_event(&mut self.location, event, app);
        OnboardingExtension::handle_event(&mut self.onboarding, event, app);
    }

    pub fn drain_background(&mut self, app: &mut AppState) -> bool {
        let location_changed = LocationExtension::on_background(&mut self.location, app);
        let onboarding_changed = OnboardingExtension::on_background(&mut self.onboarding, app);
        location_changed || onboarding_changed
    }

    pub fn show_initial_tip(&self, app: &mut AppState) {
        self.onboarding.show_initial_tip(app);
    }

    /// Restores the previous hero position through the carousel's own `go_to`.
    pub fn history_back(&mut self, app: &mut AppState) -> Option<LoadRequest> {
        let mut request = None;
        self.location.back(|position| {
            request = app.hero.go_to(position);
            request.is_some()
        })?;
        request
    }

    pub fn history_forward(&mut self, app: &mut AppState) -> Option<LoadRequest> {
        let mut request = None;
        self.location.forward(|position| {
            request = app.hero.go_to(position);
            request.is_some()
        })?;
        request
    }

    pub fn can_go_back(&self) -> bool {
        self.location.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.location.can_go_forward()
    }
}

impl Default for ExtensionHost {
    fn default() -> Self {
        Self::new()
    }
}
