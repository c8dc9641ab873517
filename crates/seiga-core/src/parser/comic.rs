//! Comic page parser for Nico Nico Seiga
//!
//! Parses HTML from a comic main page to extract the title, author,
//! serialization dates, and the episode list.

use chrono::{DateTime, FixedOffset, TimeZone};
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SeigaError};
use crate::types::{jst, Comic, Episode};

/// Start date pattern as rendered in the meta info block
const START_DATE_PATTERN: &str = r"(\d{4})年(\d{1,2})月(\d{1,2})日開始";

/// Update date pattern as rendered in the meta info block
const UPDATE_DATE_PATTERN: &str = r"(\d{4})年(\d{1,2})月(\d{1,2})日更新";

/// Label prefix preceding the author name
const AUTHOR_LABEL: &str = "作者:";

/// Tracking query suffix appended to episode links
const EPISODE_TRACKING_SUFFIX: &str = "?track=ct_episode";

/// Parse a comic from its main page HTML.
///
/// Dates are interpreted at the fixed UTC+9 offset the page uses.
///
/// # Arguments
/// * `html` - Raw HTML content of the comic main page
/// * `id` - The Seiga comic identifier (used in the result)
///
/// # Returns
/// * `Ok(Comic)` with every field populated from the page
/// * `Err(SeigaError)` naming the first anchor region that was absent
///
/// # Examples
/// ```
/// use seiga_core::parser::parse_comic;
/// use seiga_core::SeigaError;
///
/// let err = parse_comic("<html></html>", "123").unwrap_err();
/// assert!(matches!(err, SeigaError::MissingTitleBlock));
/// ```
pub fn parse_comic(html: &str, id: &str) -> Result<Comic> {
    let document = Html::parse_document(html);
    extract_comic(&document, id, jst())
}

/// Extract a comic from an already-parsed document.
///
/// Performs no I/O and holds no state; calling it twice on the same
/// document yields identical results.
///
/// # Arguments
/// * `document` - Parsed HTML document
/// * `id` - The Seiga comic identifier (used in the result)
/// * `offset` - Fixed offset the page's dates are interpreted at
pub fn extract_comic(document: &Html, id: &str, offset: FixedOffset) -> Result<Comic> {
    let mut comic = Comic::new(id);

    let (title, author) = extract_title_author(document)?;
    comic.title = title;
    comic.author = author;

    let meta_text = meta_info_text(document)?;
    comic.start = scan_date(&meta_text, START_DATE_PATTERN, offset);
    comic.update = scan_date(&meta_text, UPDATE_DATE_PATTERN, offset);

    comic.episodes = extract_episodes(document)?;

    Ok(comic)
}

/// First node matching `selector`, in document order.
fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// First descendant of `element` matching `selector`, in document order.
fn first_in<'a>(element: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    element.select(&selector).next()
}

/// Extract the title and author from the `main_title` block.
fn extract_title_author(document: &Html) -> Result<(String, String)> {
    let block = first_match(document, r#"[class="main_title"]"#)
        .ok_or(SeigaError::MissingTitleBlock)?;

    let title = first_in(block, "h1")
        .ok_or(SeigaError::MissingTitleNode)?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let author = first_in(block, "h3")
        .ok_or(SeigaError::MissingAuthorNode)?
        .text()
        .collect::<String>()
        .trim()
        .replacen(AUTHOR_LABEL, "", 1);

    Ok((title, author))
}

/// Collect the text of the first `meta_info` block.
fn meta_info_text(document: &Html) -> Result<String> {
    // The page carries several elements with the meta_info class; the one
    // holding the serialization dates appears first in document order.
    let meta = first_match(document, r#"[class="meta_info"]"#)
        .ok_or(SeigaError::MissingMetaBlock)?;

    Ok(meta.text().collect::<String>())
}

/// Scan free text for a date shaped like `2016年1月2日開始`.
///
/// Returns `None` when the pattern is absent. A matched pattern whose
/// digits form an impossible calendar date (month 13, February 30) is
/// treated the same as an absent pattern.
fn scan_date(text: &str, pattern: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let re = regex_lite::Regex::new(pattern).ok()?;
    let caps = re.captures(text)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    offset.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Extract every episode from the `episode_list` block, in page order.
///
/// An episode item without a title link fails the whole extraction; a
/// partial episode list is never returned.
fn extract_episodes(document: &Html) -> Result<Vec<Episode>> {
    let list = first_match(document, "#episode_list")
        .ok_or(SeigaError::MissingEpisodeListBlock)?;

    let mut episodes = Vec::new();
    if let Ok(item_selector) = Selector::parse(r#"li[class="episode_item"]"#) {
        for item in list.select(&item_selector) {
            let anchor = first_in(item, r#"[class="title"] > a"#)
                .ok_or(SeigaError::MissingEpisodeTitleNode)?;

            let title = anchor.text().collect::<String>().trim().to_string();
            let href = anchor.value().attr("href").unwrap_or_default();
            let url = href
                .strip_suffix(EPISODE_TRACKING_SUFFIX)
                .unwrap_or(href)
                .to_string();

            episodes.push(Episode { title, url });
        }
    }

    Ok(episodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(title_block: &str, meta_blocks: &str, episode_list: &str) -> String {
        format!(
            "<html><body>{}{}{}</body></html>",
            title_block, meta_blocks, episode_list
        )
    }

    fn title_block() -> &'static str {
        r#"<div class="main_title">
            <h1>猫耳探偵団</h1>
            <h3>作者:山田太郎</h3>
        </div>"#
    }

    fn meta_block() -> &'static str {
        r#"<div class="meta_info">全年齢対象 2015年4月1日開始 2016年12月24日更新</div>"#
    }

    fn episode_item(title: &str, href: &str) -> String {
        format!(
            r#"<li class="episode_item"><div class="title"><a href="{}">{}</a></div></li>"#,
            href, title
        )
    }

    fn episode_list() -> String {
        format!(
            r#"<div id="episode_list"><ul>{}{}{}</ul></div>"#,
            episode_item(
                "第1話",
                "http://seiga.nicovideo.jp/watch/mg1001?track=ct_episode"
            ),
            episode_item(
                "第2話",
                "http://seiga.nicovideo.jp/watch/mg1002?track=ct_episode"
            ),
            episode_item("第3話", "http://seiga.nicovideo.jp/watch/mg1003"),
        )
    }

    fn full_page() -> String {
        page(title_block(), meta_block(), &episode_list())
    }

    #[test]
    fn test_parse_comic_full_page() {
        let comic = parse_comic(&full_page(), "123").unwrap();

        assert_eq!(comic.id, "123");
        assert_eq!(comic.title, "猫耳探偵団");
        assert_eq!(comic.author, "山田太郎");
        assert_eq!(
            comic.start,
            jst().with_ymd_and_hms(2015, 4, 1, 0, 0, 0).single()
        );
        assert_eq!(
            comic.update,
            jst().with_ymd_and_hms(2016, 12, 24, 0, 0, 0).single()
        );
        assert_eq!(comic.episode_count(), 3);
    }

    #[test]
    fn test_episodes_in_page_order() {
        let comic = parse_comic(&full_page(), "123").unwrap();

        let titles: Vec<&str> = comic.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["第1話", "第2話", "第3話"]);
    }

    #[test]
    fn test_tracking_suffix_stripped() {
        let comic = parse_comic(&full_page(), "123").unwrap();

        assert_eq!(
            comic.episodes[0].url,
            "http://seiga.nicovideo.jp/watch/mg1001"
        );
        // A link without the suffix passes through untouched
        assert_eq!(
            comic.episodes[2].url,
            "http://seiga.nicovideo.jp/watch/mg1003"
        );
    }

    #[test]
    fn test_missing_title_block() {
        let html = page("", meta_block(), &episode_list());
        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingTitleBlock));
    }

    #[test]
    fn test_missing_title_heading() {
        let block = r#"<div class="main_title"><h3>作者:山田太郎</h3></div>"#;
        let html = page(block, meta_block(), &episode_list());
        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingTitleNode));
    }

    #[test]
    fn test_missing_author_heading() {
        let block = r#"<div class="main_title"><h1>猫耳探偵団</h1></div>"#;
        let html = page(block, meta_block(), &episode_list());
        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingAuthorNode));
    }

    #[test]
    fn test_author_without_label_kept_verbatim() {
        let block = r#"<div class="main_title"><h1>猫耳探偵団</h1><h3>山田太郎</h3></div>"#;
        let html = page(block, meta_block(), &episode_list());
        let comic = parse_comic(&html, "123").unwrap();
        assert_eq!(comic.author, "山田太郎");
    }

    #[test]
    fn test_missing_meta_block() {
        let html = page(title_block(), "", &episode_list());
        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingMetaBlock));
    }

    #[test]
    fn test_update_date_only_is_tolerated() {
        // An unmatched date pattern degrades to an unset date instead of
        // failing the extraction, unlike a broken episode item. Arguably
        // worth tightening, since the live page always carries both dates.
        let meta = r#"<div class="meta_info">2016年12月24日更新</div>"#;
        let html = page(title_block(), meta, &episode_list());
        let comic = parse_comic(&html, "123").unwrap();

        assert!(comic.start.is_none());
        assert_eq!(
            comic.update,
            jst().with_ymd_and_hms(2016, 12, 24, 0, 0, 0).single()
        );
    }

    #[test]
    fn test_first_meta_block_wins() {
        let metas = concat!(
            r#"<div class="meta_info">2015年4月1日開始 2016年12月24日更新</div>"#,
            r#"<div class="meta_info">2001年1月1日開始 2002年2月2日更新</div>"#,
        );
        let html = page(title_block(), metas, &episode_list());
        let comic = parse_comic(&html, "123").unwrap();

        assert_eq!(
            comic.start,
            jst().with_ymd_and_hms(2015, 4, 1, 0, 0, 0).single()
        );
        assert_eq!(
            comic.update,
            jst().with_ymd_and_hms(2016, 12, 24, 0, 0, 0).single()
        );
    }

    #[test]
    fn test_impossible_date_left_unset() {
        let meta = r#"<div class="meta_info">2015年13月1日開始 2016年2月30日更新</div>"#;
        let html = page(title_block(), meta, &episode_list());
        let comic = parse_comic(&html, "123").unwrap();

        assert!(comic.start.is_none());
        assert!(comic.update.is_none());
    }

    #[test]
    fn test_missing_episode_list_block() {
        let html = page(title_block(), meta_block(), "");
        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingEpisodeListBlock));
    }

    #[test]
    fn test_episode_item_without_title_link_is_fatal() {
        let list = format!(
            r#"<div id="episode_list"><ul>{}{}{}{}</ul></div>"#,
            episode_item("第1話", "http://seiga.nicovideo.jp/watch/mg1001"),
            episode_item("第2話", "http://seiga.nicovideo.jp/watch/mg1002"),
            episode_item("第3話", "http://seiga.nicovideo.jp/watch/mg1003"),
            // No anchor under a title-classed parent
            r#"<li class="episode_item"><div class="thumb"><a href="x">第4話</a></div></li>"#,
        );
        let html = page(title_block(), meta_block(), &list);

        let err = parse_comic(&html, "123").unwrap_err();
        assert!(matches!(err, SeigaError::MissingEpisodeTitleNode));
    }

    #[test]
    fn test_empty_episode_list_is_valid() {
        let list = r#"<div id="episode_list"><ul></ul></div>"#;
        let html = page(title_block(), meta_block(), list);
        let comic = parse_comic(&html, "123").unwrap();
        assert_eq!(comic.episode_count(), 0);
    }

    #[test]
    fn test_repeated_extraction_is_identical() {
        let html = full_page();
        let document = Html::parse_document(&html);

        let first = extract_comic(&document, "123", jst()).unwrap();
        let second = extract_comic(&document, "123", jst()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_date_no_match() {
        assert!(scan_date("毎週金曜更新", START_DATE_PATTERN, jst()).is_none());
    }

    #[test]
    fn test_scan_date_single_digit_month_and_day() {
        let parsed = scan_date("2015年4月1日開始", START_DATE_PATTERN, jst()).unwrap();
        assert_eq!(
            Some(parsed),
            jst().with_ymd_and_hms(2015, 4, 1, 0, 0, 0).single()
        );
    }

    proptest! {
        #[test]
        fn scan_date_recovers_any_valid_date(
            year in 1000i32..=9999,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let text = format!("{}年{}月{}日開始", year, month, day);
            let parsed = scan_date(&text, START_DATE_PATTERN, jst());
            prop_assert_eq!(
                parsed,
                jst().with_ymd_and_hms(year, month, day, 0, 0, 0).single()
            );
        }
    }
}
