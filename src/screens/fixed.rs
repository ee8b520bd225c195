//! Screens whose content is known when they are pushed.
//!
//! Menus, detail panes and the steps of the add-refueling flow never call the
//! bridge. A [`FixedScreen`] holds its template plus what each row or button
//! leads to.

use crate::host::NavigationIntent;
use crate::screen::{Action, Route, Screen, ScreenEvent, ScreenId};
use crate::ui::Template;

pub struct FixedScreen {
    id: ScreenId,
    template: Template,
    /// Route pushed when the row at the same index is selected.
    targets: Vec<Option<Route>>,
    navigation: Option<NavigationIntent>,
}

impl FixedScreen {
    #[must_use]
    pub const fn new(id: ScreenId, template: Template) -> Self {
        Self {
            id,
            template,
            targets: Vec::new(),
            navigation: None,
        }
    }

    /// Sets the routes of the rows, by row index.
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<Option<Route>>) -> Self {
        self.targets = targets;
        self
    }

    /// Sets the intent launched by [`ScreenEvent::Navigate`].
    #[must_use]
    pub fn with_navigation(mut self, intent: NavigationIntent) -> Self {
        self.navigation = Some(intent);
        self
    }
}

impl Screen for FixedScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn template(&self) -> Template {
        self.template.clone()
    }

    fn handle(&mut self, event: &ScreenEvent) -> Vec<Action> {
        match event {
            ScreenEvent::Select(index) => self
                .targets
                .get(*index)
                .cloned()
                .flatten()
                .map(Action::Push)
                .into_iter()
                .collect(),
            ScreenEvent::Navigate => self
                .navigation
                .clone()
                .map(Action::LaunchNavigation)
                .into_iter()
                .collect(),
            ScreenEvent::Back => vec![Action::Pop],
            ScreenEvent::Retry | ScreenEvent::AddRefueling => Vec::new(),
        }
    }
}
