//! Text rendering of every screen
//!
//! Each function returns the complete text of one screen (or screen part) so
//! the terminal front-end only has to print it.

use crate::carousel::CarouselController;
use crate::catalog::{CatalogItem, Series, ShortFilm};
use crate::navigation::Tab;
use crate::player::{VideoEmbed, thumbnail_url};
use crate::series_detail::SeriesDetail;

/// Application name shown in the header
pub const APP_NAME: &str = "Stillness";

const RULE: &str = "────────────────────────────────────────";

/// Title of the grid listing every item of a tab.
pub fn grid_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Series => "All Series & Cartoons",
        _ => "All Films",
    }
}

/// Title of the featured carousel of a tab.
pub fn carousel_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Series => "Featured Series",
        _ => "Featured Films",
    }
}

/// Shown while the catalog is being fetched.
pub fn render_loading() -> String {
    format!("{}\n\nLoading {}...\n", RULE, APP_NAME)
}

/// The Home screen: header, tab content and the bottom navigation bar.
pub fn render_home(tab: Tab, items: &[CatalogItem], carousel: Option<&CarouselController>) -> String {
    let mut screen = String::new();

    screen.push_str(&format!("{}\n{}\n", RULE, APP_NAME));
    screen.push_str("by Daptar (दप्तर) · https://daptar.digital\n");
    screen.push_str(&format!("{}\n\n", RULE));

    if tab == Tab::Why {
        screen.push_str(&render_why());
    } else {
        if let Some(carousel) = carousel.filter(|c| !c.is_empty()) {
            screen.push_str(&render_carousel(tab, carousel));
            screen.push('\n');
        }
        screen.push_str(&render_grid(grid_title(tab), items));
    }

    screen.push('\n');
    screen.push_str(&render_navigation(tab));
    screen
}

/// The featured strip: active slide plus position indicators.
///
/// An empty carousel renders nothing.
pub fn render_carousel(tab: Tab, carousel: &CarouselController) -> String {
    let Some(item) = carousel.active_item() else {
        return String::new();
    };

    let mut strip = String::new();
    strip.push_str(&format!("=== {} ===\n", carousel_title(tab)));
    strip.push_str(&format!("  {}\n", item.name()));
    strip.push_str(&format!("  {}\n", thumbnail_url(item.preview_video_id())));

    if carousel.shows_indicators() {
        let dots: Vec<&str> = (0..carousel.display_count())
            .map(|i| if i == carousel.active_index() { "●" } else { "○" })
            .collect();
        strip.push_str(&format!("  {}\n", dots.join(" ")));
    }

    strip
}

/// The grid of every item in a tab, numbered for `open <n>`.
pub fn render_grid(title: &str, items: &[CatalogItem]) -> String {
    let mut grid = format!("=== {} ===\n", title);

    for (index, item) in items.iter().enumerate() {
        grid.push_str(&format!(
            "  [{}] {} ({})\n",
            index + 1,
            item.name(),
            item.recommended_age()
        ));
        grid.push_str(&format!("      {}\n", thumbnail_url(item.preview_video_id())));
    }

    grid
}

fn render_navigation(active: Tab) -> String {
    let labels: Vec<String> = [Tab::Shorts, Tab::Series, Tab::Why]
        .into_iter()
        .map(|tab| {
            if tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect();

    format!("{}\n{}\n", RULE, labels.join("   "))
}

/// The static "Why?" page.
pub fn render_why() -> String {
    let mut page = String::new();

    page.push_str("== Digital Awareness ==\n");
    page.push_str(
        "Mobile-first platforms expose children to fast-cut, algorithm-driven video \
         and constant notifications. This leads to:\n",
    );
    for effect in [
        "Shortened attention spans",
        "Constant distraction",
        "Device dependency",
    ] {
        page.push_str(&format!("  • {}\n", effect));
    }
    page.push_str(&format!(
        "{} exists to raise awareness that these patterns are real and widespread.\n\n",
        APP_NAME
    ));

    page.push_str("== Healthier Alternatives ==\n");
    page.push_str(
        "The goal is not to remove all screens but to shift toward healthier screen \
         experiences. Parents choose content mindfully; this catalog shows what curated, \
         non-addictive content looks like.\n\n",
    );

    page.push_str("== Curated from Experts ==\n");
    page.push_str(
        "Content is sourced from creators, educators and awareness-focused pages sharing \
         research-backed insights on digital well-being. This is a curation tool, not a \
         content factory.\n\n",
    );

    page.push_str("== The Daptar Project ==\n");
    page.push_str("Daptar (दप्तर) reimagines the tablet as a school bag to address:\n");
    for problem in [
        "Mobile phone addiction & distraction",
        "Child safety in digital environments",
        "Physical & mental health impacts of device use",
        "Digital literacy and skill-building",
        "Accessibility of age-appropriate digital devices",
    ] {
        page.push_str(&format!("  • {}\n", problem));
    }
    page.push_str(
        "Read more: https://daptar.digital/blog/posts/daptar-tablet-ask-for-collaboration/index.html\n",
    );

    page
}

fn render_back_header(title: &str) -> String {
    format!("{}\n< {}\n{}\n", RULE, title, RULE)
}

fn render_player(embed: &VideoEmbed) -> String {
    format!("▶ {}\n  {}\n", embed.title, embed.embed_url())
}

/// The detail screen of a series.
///
/// `series` is `None` when the id is not in the catalog; `detail` is `None`
/// before any episode state exists.
pub fn render_series_detail(series: Option<&Series>, detail: Option<&SeriesDetail>) -> String {
    let Some(series) = series else {
        return format!("{}\nSeries not found.\n", render_back_header("Back"));
    };

    let mut screen = render_back_header(&series.name);

    let Some(detail) = detail.filter(|d| !d.is_loading()) else {
        screen.push_str("\nLoading episodes...\n");
        return screen;
    };

    let (Some(episode), Some(season)) = (detail.active_episode(), detail.active_season()) else {
        screen.push_str("\nNo episodes found.\n");
        return screen;
    };

    screen.push_str(&render_player(&VideoEmbed::new(
        &episode.youtube_video_id,
        true,
        &episode.name,
    )));
    screen.push_str(&format!("\n{}\n", episode.name));
    screen.push_str(&format!(
        "Season {} • Episode {}\n\n",
        season, episode.episode_number
    ));
    screen.push_str(&format!("{}\n\n", series.description));

    let tabs: Vec<String> = detail
        .season_numbers()
        .into_iter()
        .map(|number| {
            if number == season {
                format!("[Season {}]", number)
            } else {
                format!(" Season {} ", number)
            }
        })
        .collect();
    screen.push_str(&format!("{}\n\n", tabs.join(" ")));

    for candidate in detail.episodes_in_active_season() {
        let marker = if candidate.id == episode.id { "▶" } else { " " };
        screen.push_str(&format!(
            "  {} {:>2}. {} ({})\n",
            marker, candidate.episode_number, candidate.name, candidate.duration
        ));
    }

    screen
}

/// The detail screen of a short film.
pub fn render_short_detail(film: Option<&ShortFilm>) -> String {
    let mut screen = render_back_header("Film");

    let Some(film) = film else {
        screen.push_str("\nFilm not found.\n");
        return screen;
    };

    screen.push_str(&render_player(&VideoEmbed::new(
        &film.youtube_video_id,
        true,
        &film.name,
    )));
    screen.push_str(&format!("\n{}\n", film.name));
    screen.push_str(&format!("{} · Age {}\n\n", film.genre, film.recommended_age));
    screen.push_str(&format!("About\n{}\n", film.description));

    screen
}
