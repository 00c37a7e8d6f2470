//! Browsing session
//!
//! `App` owns every piece of session state and is driven from a single
//! logical thread: user commands, fetch completions and carousel ticks are
//! handled one at a time. Fetches and the carousel timer run as spawned tasks
//! that report back through channels.

use crate::carousel::{CarouselController, CarouselTick};
use crate::catalog::{
    Catalog, CatalogError, CatalogLoad, Episode, TableStore, fetch_episodes, load_catalog,
};
use crate::command::Command;
use crate::navigation::{Navigator, Screen, Tab, Transition};
use crate::series_detail::SeriesDetail;
use crate::views;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Completion of background work, delivered back to the session.
#[derive(Debug)]
pub enum AppEvent {
    /// Both catalog collections settled
    CatalogLoaded(CatalogLoad),

    /// The episode fetch started for `series_id` settled
    EpisodesLoaded {
        series_id: String,
        result: Result<Vec<Episode>, CatalogError>,
    },

    /// The carousel timer expired
    CarouselTick(CarouselTick),
}

/// What the front-end has to show after handling an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Nothing visible changed
    Nothing,
    /// The screen must be drawn again
    Screen { reset_scroll: bool },
    /// Only the featured carousel moved
    Carousel,
    /// A message for the user
    Message(String),
    Quit,
}

impl From<Transition> for Update {
    fn from(transition: Transition) -> Self {
        if transition.changed() {
            Update::Screen {
                reset_scroll: transition.reset_scroll,
            }
        } else {
            Update::Nothing
        }
    }
}

/// A browsing session over a table store.
pub struct App<S: TableStore> {
    store: Arc<S>,
    autoplay_interval: Duration,
    /// `None` while the catalog is loading
    catalog: Option<Catalog>,
    load_requested: bool,
    navigator: Navigator,
    /// Carousel of the Home tab it was built for
    carousel: Option<(Tab, CarouselController)>,
    detail: Option<SeriesDetail>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    ticks_tx: UnboundedSender<CarouselTick>,
    ticks_rx: UnboundedReceiver<CarouselTick>,
}

impl<S: TableStore> App<S> {
    /// Creates a session that will show `start` once the catalog is loaded.
    pub fn new(store: S, start: Screen, autoplay_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();

        Self {
            store: Arc::new(store),
            autoplay_interval,
            catalog: None,
            load_requested: false,
            navigator: Navigator::at(start),
            carousel: None,
            detail: None,
            events_tx,
            events_rx,
            ticks_tx,
            ticks_rx,
        }
    }

    /// Requests the catalog. Only the first call does anything.
    ///
    /// A panic inside the load is caught and reported as a failed load, so the
    /// session always leaves the loading state.
    pub fn start(&mut self) -> bool {
        if self.load_requested {
            return false;
        }
        self.load_requested = true;

        let store = Arc::clone(&self.store);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let load = match tokio::spawn(async move { load_catalog(store.as_ref()).await }).await
            {
                Ok(load) => load,
                Err(e) => {
                    tracing::error!(error = %e, "failed to fetch catalog");
                    CatalogLoad::aborted(&e.to_string())
                }
            };

            let _ = events.send(AppEvent::CatalogLoaded(load));
        });

        true
    }

    /// Waits for the next background event.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        tokio::select! {
            Some(event) = self.events_rx.recv() => Some(event),
            Some(tick) = self.ticks_rx.recv() => Some(AppEvent::CarouselTick(tick)),
            else => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_none()
    }

    /// True once nothing is pending for the current screen.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && !self.detail.as_ref().is_some_and(|d| d.is_loading())
    }

    pub fn screen(&self) -> &Screen {
        self.navigator.screen()
    }

    pub fn location(&self) -> String {
        self.navigator.location()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn carousel(&self) -> Option<&CarouselController> {
        self.carousel.as_ref().map(|(_, carousel)| carousel)
    }

    pub fn series_detail(&self) -> Option<&SeriesDetail> {
        self.detail.as_ref()
    }

    /// Applies a background event.
    pub fn handle_event(&mut self, event: AppEvent) -> Update {
        match event {
            AppEvent::CatalogLoaded(load) => {
                self.catalog = Some(Catalog::from_load(load));
                self.sync_screen();
                Update::Screen { reset_scroll: true }
            }
            AppEvent::EpisodesLoaded { series_id, result } => {
                let applied = self
                    .detail
                    .as_mut()
                    .is_some_and(|detail| detail.apply_episodes(&series_id, result));
                if applied {
                    Update::Screen {
                        reset_scroll: false,
                    }
                } else {
                    Update::Nothing
                }
            }
            AppEvent::CarouselTick(tick) => {
                let advanced = self
                    .carousel
                    .as_mut()
                    .is_some_and(|(_, carousel)| carousel.on_tick(tick));
                if advanced {
                    Update::Carousel
                } else {
                    Update::Nothing
                }
            }
        }
    }

    /// Applies a user command.
    pub fn handle_command(&mut self, command: Command) -> Update {
        match command {
            Command::Tab { tab } => {
                if !matches!(self.screen(), Screen::Home(_)) {
                    return Update::Message("Go back to the home screen to switch tabs.".to_string());
                }
                let transition = self.navigator.select_tab(tab);
                self.after(transition)
            }
            Command::Open { index } => self.open_grid_item(index),
            Command::Featured => {
                let item = self.carousel().and_then(|c| c.active_item()).cloned();
                match item {
                    Some(item) => {
                        let transition = self.navigator.open(&item);
                        self.after(transition)
                    }
                    None => Update::Message("Nothing is featured here.".to_string()),
                }
            }
            Command::Dot { index } => self.with_carousel(|carousel| carousel.jump_to(index)),
            Command::Scroll { offset } => self.with_carousel(|carousel| {
                carousel.on_user_scroll(offset);
                true
            }),
            Command::Hold => match self.carousel.as_mut() {
                Some((_, carousel)) => {
                    carousel.pause();
                    Update::Message("Carousel paused.".to_string())
                }
                None => Update::Nothing,
            },
            Command::Release => match self.carousel.as_mut() {
                Some((_, carousel)) => {
                    carousel.resume();
                    Update::Message("Carousel resumed.".to_string())
                }
                None => Update::Nothing,
            },
            Command::Season { number } => self.with_detail(|detail| detail.select_season(number)),
            Command::Episode { number } => self.with_detail(|detail| detail.select_episode(number)),
            Command::Back => {
                let transition = self.navigator.back();
                self.after(transition)
            }
            Command::Goto { location } => match Screen::from_location(&location) {
                Ok(screen) => {
                    let transition = self.navigator.goto(screen);
                    self.after(transition)
                }
                Err(e) => Update::Message(e.to_string()),
            },
            Command::Where => Update::Message(self.location()),
            Command::Quit => Update::Quit,
        }
    }

    /// The full text of the current screen.
    pub fn render(&self) -> String {
        let Some(catalog) = &self.catalog else {
            return views::render_loading();
        };

        match self.navigator.screen() {
            Screen::Home(tab) => {
                views::render_home(*tab, &catalog.items_for(*tab), self.carousel())
            }
            Screen::SeriesDetail(id) => {
                views::render_series_detail(catalog.find_series(id), self.detail.as_ref())
            }
            Screen::ShortDetail(id) => views::render_short_detail(catalog.find_short(id)),
        }
    }

    /// Only the featured strip, for redraws after a carousel move.
    pub fn render_carousel(&self) -> String {
        match (&self.carousel, self.navigator.screen()) {
            (Some((tab, carousel)), Screen::Home(_)) => views::render_carousel(*tab, carousel),
            _ => String::new(),
        }
    }

    fn open_grid_item(&mut self, index: usize) -> Update {
        let Some(catalog) = &self.catalog else {
            return Update::Message("The catalog is still loading.".to_string());
        };
        let Screen::Home(tab) = self.navigator.screen() else {
            return Update::Message("Go back to the home screen to open a title.".to_string());
        };

        match catalog.items_for(*tab).get(index) {
            Some(item) => {
                let item = item.clone();
                let transition = self.navigator.open(&item);
                self.after(transition)
            }
            None => Update::Message(format!("There is no item {} here.", index + 1)),
        }
    }

    fn with_carousel(&mut self, action: impl FnOnce(&mut CarouselController) -> bool) -> Update {
        let Some((_, carousel)) = self.carousel.as_mut() else {
            return Update::Message("There is no carousel on this screen.".to_string());
        };

        if action(carousel) {
            Update::Carousel
        } else {
            Update::Message("No such slide.".to_string())
        }
    }

    fn with_detail(&mut self, action: impl FnOnce(&mut SeriesDetail) -> bool) -> Update {
        let Some(detail) = self.detail.as_mut().filter(|d| !d.is_loading()) else {
            return Update::Message("Open a series to pick seasons and episodes.".to_string());
        };

        if action(detail) {
            Update::Screen {
                reset_scroll: false,
            }
        } else {
            Update::Message("This series has no such season or episode.".to_string())
        }
    }

    /// Brings carousel and episode state in line with a navigation result.
    fn after(&mut self, transition: Transition) -> Update {
        if transition.changed() {
            self.sync_screen();
        }
        transition.into()
    }

    /// Creates or discards per-screen state for the current screen.
    ///
    /// The carousel lives while its Home tab is shown; switching tabs or
    /// leaving Home drops it, which cancels its timer. Entering a series starts
    /// its episode fetch.
    fn sync_screen(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };

        match self.navigator.screen().clone() {
            Screen::Home(tab) => {
                self.detail = None;

                let current = matches!(&self.carousel, Some((shown, _)) if *shown == tab);
                if !current {
                    let items = catalog.items_for(tab);
                    self.carousel = if items.is_empty() {
                        None
                    } else {
                        let mut carousel = CarouselController::new(
                            &items,
                            self.autoplay_interval,
                            self.ticks_tx.clone(),
                        );
                        carousel.start();
                        Some((tab, carousel))
                    };
                }
            }
            Screen::SeriesDetail(id) => {
                self.carousel = None;

                if catalog.find_series(&id).is_none() {
                    tracing::debug!(series_id = %id, "series not in catalog");
                    self.detail = None;
                    return;
                }

                let needs_fetch = match self.detail.as_mut() {
                    Some(detail) => detail.retarget(&id),
                    None => true,
                };
                if self.detail.is_none() {
                    self.detail = Some(SeriesDetail::new(&id));
                }
                if needs_fetch {
                    self.spawn_episode_fetch(id);
                }
            }
            Screen::ShortDetail(_) => {
                self.carousel = None;
                self.detail = None;
            }
        }
    }

    fn spawn_episode_fetch(&self, series_id: String) {
        let store = Arc::clone(&self.store);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = fetch_episodes(store.as_ref(), &series_id).await;
            let _ = events.send(AppEvent::EpisodesLoaded { series_id, result });
        });
    }
}
