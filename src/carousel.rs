//! Featured carousel
//!
//! The carousel shows the first few items of a collection as horizontally
//! paged slides and advances on its own. All timer handling lives in
//! `CarouselController`: view events only call into it.

use crate::catalog::CatalogItem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Maximum number of items shown by the carousel
pub const MAX_SLIDES: usize = 5;

/// Default delay between two automatic advances
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);

/// Width of one page in scroll units when no viewport is known
pub const DEFAULT_PAGE_WIDTH: f32 = 100.0;

/// Source of process-unique timer ids, so ticks of a cancelled timer are
/// never mistaken for ticks of its successor.
static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// A timer expiry posted by a running carousel timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTick {
    pub timer_id: u64,
}

/// The single recurring timer owned by a carousel.
#[derive(Debug)]
struct AutoplayTimer {
    id: u64,
    task: JoinHandle<()>,
}

impl Drop for AutoplayTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Autoplay and scroll state of one carousel instance.
///
/// A controller is bound to one item set. When the set changes identity the
/// controller is dropped and a new one created, which cancels the old timer.
#[derive(Debug)]
pub struct CarouselController {
    /// The displayed subset, at most `MAX_SLIDES` items
    slides: Vec<CatalogItem>,
    active: usize,
    /// Horizontal scroll position of the track
    scroll_offset: f32,
    page_width: f32,
    interval: Duration,
    timer: Option<AutoplayTimer>,
    ticks: UnboundedSender<CarouselTick>,
}

impl CarouselController {
    /// Creates a stopped carousel over the first `MAX_SLIDES` items.
    ///
    /// # Arguments
    ///
    /// * `items` - The collection to feature; only its head is displayed
    /// * `interval` - Delay between automatic advances
    /// * `ticks` - Channel receiving timer expiries, to be fed back via `on_tick`
    pub fn new(
        items: &[CatalogItem],
        interval: Duration,
        ticks: UnboundedSender<CarouselTick>,
    ) -> Self {
        Self {
            slides: items.iter().take(MAX_SLIDES).cloned().collect(),
            active: 0,
            scroll_offset: 0.0,
            page_width: DEFAULT_PAGE_WIDTH,
            interval,
            timer: None,
            ticks,
        }
    }

    pub fn display_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[CatalogItem] {
        &self.slides
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Whether an autoplay timer is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Indicator dots are only useful with more than one slide.
    pub fn shows_indicators(&self) -> bool {
        self.slides.len() > 1
    }

    /// Returns the slide at `index` for the click handler. Does not change the active page.
    pub fn item(&self, index: usize) -> Option<&CatalogItem> {
        self.slides.get(index)
    }

    pub fn active_item(&self) -> Option<&CatalogItem> {
        self.item(self.active)
    }

    /// Starts (or restarts from zero) the autoplay timer.
    ///
    /// An empty carousel never starts a timer.
    pub fn start(&mut self) {
        if self.slides.is_empty() {
            return;
        }

        // Replacing the timer drops, and thereby aborts, the previous one
        self.timer = Some(self.spawn_timer());
    }

    /// Cancels the autoplay timer.
    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Press-and-hold: suspends autoplay until `resume`.
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Release after a press: autoplay restarts with a full interval.
    pub fn resume(&mut self) {
        self.start();
    }

    /// Indicator selection: scrolls to page `index` and restarts the timer.
    ///
    /// Returns false for an index outside the displayed slides.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }

        self.scroll_to(index);
        self.start();
        true
    }

    /// A user drag or swipe moved the track. The timer keeps running.
    pub fn on_user_scroll(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
        self.active = self.nearest_page();
    }

    /// Handles a timer expiry. Returns true when the carousel advanced.
    ///
    /// Ticks from a cancelled or replaced timer are ignored, as are ticks while
    /// the track has no width.
    pub fn on_tick(&mut self, tick: CarouselTick) -> bool {
        let current_timer = self.timer.as_ref().map(|timer| timer.id);
        if current_timer != Some(tick.timer_id) {
            tracing::debug!(timer_id = tick.timer_id, "ignoring tick of stale carousel timer");
            return false;
        }

        if self.page_width == 0.0 || self.slides.is_empty() {
            return false;
        }

        let next = (self.nearest_page() + 1) % self.slides.len();
        self.scroll_to(next);
        true
    }

    /// Scrolls exactly onto the boundary of page `index`.
    fn scroll_to(&mut self, index: usize) {
        self.active = index;
        self.scroll_offset = self.page_width * index as f32;
    }

    /// The page closest to the current scroll offset, clamped to the slides.
    fn nearest_page(&self) -> usize {
        if self.page_width == 0.0 || self.slides.is_empty() {
            return 0;
        }

        let page = (self.scroll_offset / self.page_width).round() as usize;
        page.min(self.slides.len() - 1)
    }

    fn spawn_timer(&self) -> AutoplayTimer {
        let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
        let period = self.interval;
        let ticks = self.ticks.clone();
        let first = tokio::time::Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            loop {
                interval.tick().await;
                if ticks.send(CarouselTick { timer_id: id }).is_err() {
                    // Nobody listens anymore
                    break;
                }
            }
        });

        AutoplayTimer { id, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::short;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn items(count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| CatalogItem::Short(short(&format!("f{i}"), &format!("Film {i}"))))
            .collect()
    }

    fn carousel(count: usize) -> (CarouselController, UnboundedReceiver<CarouselTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CarouselController::new(&items(count), AUTOPLAY_INTERVAL, tx), rx)
    }

    /// Lets spawned timer tasks observe the current (paused) clock.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    async fn elapse(duration: Duration) {
        tokio::time::advance(duration).await;
        settle().await;
    }

    #[test]
    fn test_display_count_is_capped() {
        let (tx, _rx) = mpsc::unbounded_channel();
        for count in [1, 3, 5, 6, 12] {
            let controller = CarouselController::new(&items(count), AUTOPLAY_INTERVAL, tx.clone());
            assert_eq!(controller.display_count(), count.min(MAX_SLIDES));
            assert_eq!(controller.active_index(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_carousel_starts_no_timer() {
        let (mut controller, mut rx) = carousel(0);
        controller.start();
        assert!(!controller.is_running());
        assert!(!controller.shows_indicators());

        elapse(AUTOPLAY_INTERVAL * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_and_wraps() {
        let (mut controller, mut rx) = carousel(5);
        controller.start();
        settle().await;

        for expected in [1, 2, 3, 4, 0] {
            let tick = rx.recv().await.unwrap();
            assert!(controller.on_tick(tick));
            assert_eq!(controller.active_index(), expected);
            assert_eq!(controller.scroll_offset(), DEFAULT_PAGE_WIDTH * expected as f32);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cycle_returns_to_jumped_slide() {
        let (mut controller, mut rx) = carousel(4);
        controller.start();
        assert!(controller.jump_to(2));
        settle().await;

        for expected in [3, 0, 1, 2] {
            let tick = rx.recv().await.unwrap();
            assert!(controller.on_tick(tick));
            assert_eq!(controller.active_index(), expected);
        }
        assert_eq!(controller.scroll_offset(), DEFAULT_PAGE_WIDTH * 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_fires_after_one_interval() {
        let (mut controller, mut rx) = carousel(3);
        controller.start();
        settle().await;

        elapse(AUTOPLAY_INTERVAL - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err());

        elapse(Duration::from_millis(1)).await;
        let tick = rx.try_recv().unwrap();
        assert!(controller.on_tick(tick));
        assert_eq!(controller.active_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_item_wraps_to_itself() {
        let (mut controller, mut rx) = carousel(1);
        controller.start();
        assert!(!controller.shows_indicators());

        let tick = rx.recv().await.unwrap();
        controller.on_tick(tick);
        assert_eq!(controller.active_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_sets_index_and_restarts_timer() {
        let (mut controller, mut rx) = carousel(5);
        controller.start();
        settle().await;

        elapse(Duration::from_millis(4000)).await;
        assert!(controller.jump_to(3));
        assert_eq!(controller.active_index(), 3);
        settle().await;

        // The old timer would have fired here
        elapse(Duration::from_millis(4000)).await;
        assert!(rx.try_recv().is_err());

        elapse(Duration::from_millis(1000)).await;
        let tick = rx.try_recv().unwrap();
        assert!(controller.on_tick(tick));
        assert_eq!(controller.active_index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_rejects_out_of_range() {
        let (mut controller, _rx) = carousel(2);
        controller.jump_to(1);
        assert!(!controller.jump_to(2));
        assert_eq!(controller.active_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_scroll_snaps_to_nearest_page_without_restart() {
        let (mut controller, mut rx) = carousel(4);
        controller.start();
        settle().await;

        elapse(Duration::from_millis(3000)).await;
        controller.on_user_scroll(140.0);
        assert_eq!(controller.active_index(), 1);
        controller.on_user_scroll(250.0);
        assert_eq!(controller.active_index(), 3);
        controller.on_user_scroll(10_000.0);
        assert_eq!(controller.active_index(), 3);

        // The running timer still fires on schedule and advances from the scrolled page
        elapse(Duration::from_millis(2000)).await;
        let tick = rx.try_recv().unwrap();
        assert!(controller.on_tick(tick));
        assert_eq!(controller.active_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume() {
        let (mut controller, mut rx) = carousel(3);
        controller.start();
        settle().await;

        controller.pause();
        assert!(!controller.is_running());
        elapse(AUTOPLAY_INTERVAL * 3).await;
        assert!(rx.try_recv().is_err());

        controller.resume();
        let tick = rx.recv().await.unwrap();
        assert!(controller.on_tick(tick));
        assert_eq!(controller.active_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticks_are_ignored() {
        let (mut controller, mut rx) = carousel(3);
        controller.start();
        let tick = rx.recv().await.unwrap();

        // Restarting replaces the timer; its predecessor's tick must not count
        controller.start();
        assert!(!controller.on_tick(tick));
        assert_eq!(controller.active_index(), 0);

        controller.stop();
        assert!(!controller.on_tick(tick));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_cancels_timer() {
        let (mut controller, mut rx) = carousel(3);
        controller.start();
        settle().await;
        drop(controller);
        settle().await;

        // The channel closes once the aborted task released its sender
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_page_width_skips_ticks() {
        let (mut controller, mut rx) = carousel(3);
        controller.page_width = 0.0;
        controller.start();
        let tick = rx.recv().await.unwrap();
        assert!(!controller.on_tick(tick));
        assert_eq!(controller.active_index(), 0);
    }

    #[test]
    fn test_item_selection_does_not_move_carousel() {
        let (controller, _rx) = carousel(3);
        assert_eq!(controller.item(2).map(|item| item.id()), Some("f2"));
        assert!(controller.item(3).is_none());
        assert_eq!(controller.active_index(), 0);
    }
}
