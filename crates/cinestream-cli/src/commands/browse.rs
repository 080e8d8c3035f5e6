use crate::commands::parse_target;
use crate::commands::spinner::Spinner;
use crate::context::AppContext;
use crate::display::{score_label, styled_table, titles_table};
use crate::output::Output;
use cinestream_models::{CatalogFields, CatalogItem, MediaType};
use cinestream_sources::{
    image_url_with_base, trailer_url, videos_of, CatalogSource, Genre, ImageKind, ImageSize,
    ListCategory, Page, SearchFilter, TimeWindow,
};
use color_eyre::eyre::{Context, Result};
use comfy_table::{Attribute, Cell, Color};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;

const CAST_LIMIT: usize = 8;
const RECOMMENDATION_LIMIT: usize = 6;

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
    #[serde(default)]
    character: String,
}

fn plural(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "Movies",
        MediaType::Tv => "TV Series",
    }
}

fn category_title(category: ListCategory) -> &'static str {
    match category {
        ListCategory::Popular => "Popular",
        ListCategory::TopRated => "Top Rated",
        ListCategory::Upcoming => "Upcoming",
        ListCategory::NowPlaying => "Now Playing",
    }
}

/// Run a catalog request behind a spinner
async fn fetch<T, F>(message: String, output: &Output, request: F) -> Result<T>
where
    F: Future<Output = Result<T, cinestream_sources::SourceError>>,
{
    let spinner = Spinner::start(message.clone(), output.is_quiet());
    let result = request.await;
    spinner.finish();
    result.wrap_err_with(|| format!("{} failed", message))
}

pub async fn run_trending(
    ctx: &AppContext,
    media_type: MediaType,
    window: TimeWindow,
    page: u32,
    output: &Output,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let results = fetch(
        format!("Fetching trending {}", plural(media_type).to_lowercase()),
        output,
        catalog.trending(media_type, window, page),
    )
    .await?;
    let heading = format!("Trending {} this {}", plural(media_type), window);
    show_page(ctx, &heading, &results, output)
}

pub async fn run_category(
    ctx: &AppContext,
    media_type: MediaType,
    category: ListCategory,
    page: u32,
    output: &Output,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let title = category_title(category);
    let results = fetch(
        format!("Fetching {} {}", title.to_lowercase(), plural(media_type).to_lowercase()),
        output,
        catalog.list(media_type, category, page),
    )
    .await?;
    let heading = format!("{} {}", title, plural(media_type));
    show_page(ctx, &heading, &results, output)
}

pub async fn run_genres(ctx: &AppContext, media_type: MediaType, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let genres: Vec<Genre> = fetch(
        format!("Fetching {} genres", media_type.label().to_lowercase()),
        output,
        catalog.genres(media_type),
    )
    .await?;

    if !output.is_human() {
        output.json(&serde_json::to_value(&genres)?);
        return Ok(());
    }

    output.heading(format!("{} Genres", media_type.label()));
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Genre").add_attribute(Attribute::Bold),
    ]);
    for genre in &genres {
        table.add_row(vec![
            Cell::new(genre.id).fg(Color::Cyan),
            Cell::new(&genre.name),
        ]);
    }
    output.table(&table);
    output.info(format!(
        "Browse one with `cinestream discover {} <genre-id>`",
        media_type
    ));
    Ok(())
}

pub async fn run_discover(
    ctx: &AppContext,
    media_type: MediaType,
    genre_id: u32,
    page: u32,
    output: &Output,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let results = fetch(
        format!("Discovering {} in genre {}", plural(media_type).to_lowercase(), genre_id),
        output,
        catalog.discover_by_genre(media_type, genre_id, page),
    )
    .await?;
    let heading = format!("{} in genre {}", plural(media_type), genre_id);
    show_page(ctx, &heading, &results, output)
}

pub async fn run_search(
    ctx: &AppContext,
    query: &str,
    media_type: Option<MediaType>,
    page: u32,
    output: &Output,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let results = fetch(
        format!("Searching for \"{}\"", query),
        output,
        catalog.search(query, SearchFilter::from(media_type), page),
    )
    .await?;
    let heading = format!("Results for \"{}\"", query.trim());
    show_page(ctx, &heading, &results, output)
}

pub async fn run_show(ctx: &AppContext, target: Vec<String>, output: &Output) -> Result<()> {
    let key = parse_target(&target)?;
    let catalog = ctx.catalog()?;
    let item = fetch(
        format!("Fetching details for {}", key),
        output,
        catalog.details(key.media_type, key.id),
    )
    .await?;

    let store = ctx.open_list();
    let saved = store.is_saved(key.id, key.media_type);
    let image_base = ctx.config.tmdb.image_base_url.as_str();
    let poster = image_url_with_base(image_base, item.poster_path(), ImageKind::Poster, ImageSize::Large);
    let backdrop = image_url_with_base(image_base, item.backdrop_path(), ImageKind::Backdrop, ImageSize::Large);
    let trailer = videos_of(&item).and_then(|videos| trailer_url(&videos));

    if !output.is_human() {
        output.json(&json!({
            "item": item,
            "saved": saved,
            "poster_url": poster,
            "backdrop_url": backdrop,
            "trailer_url": trailer,
        }));
        return Ok(());
    }

    let title = item.title().unwrap_or("(untitled)");
    match item.release_year() {
        Some(year) => output.heading(format!("{} ({})", title, year)),
        None => output.heading(title),
    }

    let mut table = styled_table();
    let mut row = |label: &str, value: String| {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    };
    row("Key", key.to_string());
    row("Type", key.media_type.label().to_string());
    row("Released", item.release_date().unwrap_or("unknown").to_string());
    row("Score", score_label(item.score_percent()));
    row("Genres", genre_names(&item).join(", "));
    if let Some(length) = length_label(&item) {
        row("Length", length);
    }
    row("In My List", if saved { "✓".to_string() } else { "✗".to_string() });
    if let Some(url) = &poster {
        row("Poster", url.clone());
    }
    if let Some(url) = &backdrop {
        row("Backdrop", url.clone());
    }
    if let Some(url) = &trailer {
        row("Trailer", url.clone());
    }
    output.table(&table);

    if let Some(overview) = item.overview() {
        output.info(format!("\n{}", overview));
    }

    let cast = top_cast(&item);
    if !cast.is_empty() {
        output.heading("Cast");
        let mut cast_table = styled_table();
        for member in cast {
            cast_table.add_row(vec![Cell::new(&member.name), Cell::new(&member.character)]);
        }
        output.table(&cast_table);
    }

    let recommended = recommendations(&item);
    if !recommended.is_empty() {
        output.heading("Recommended");
        output.table(&titles_table(
            recommended.iter().map(|rec| (rec.key(), rec)),
            |key| store.is_saved(key.id, key.media_type),
        ));
    }
    Ok(())
}

fn show_page(ctx: &AppContext, heading: &str, page: &Page<CatalogItem>, output: &Output) -> Result<()> {
    if !output.is_human() {
        output.json(&serde_json::to_value(page)?);
        return Ok(());
    }

    output.heading(heading);
    if page.results.is_empty() {
        output.info("No titles found");
        return Ok(());
    }

    let store = ctx.open_list();
    output.table(&titles_table(
        page.results.iter().map(|item| (item.key(), item)),
        |key| store.is_saved(key.id, key.media_type),
    ));

    let mut footer = format!(
        "Page {} of {} ({} results)",
        page.page,
        page.total_pages.max(1),
        page.total_results
    );
    if page.has_more() {
        footer.push_str(&format!(". Next: --page {}", page.page + 1));
    }
    output.info(footer);
    Ok(())
}

fn genre_names<T: CatalogFields>(record: &T) -> Vec<String> {
    record
        .fields()
        .get("genres")
        .cloned()
        .and_then(|value| serde_json::from_value::<Vec<Genre>>(value).ok())
        .unwrap_or_default()
        .into_iter()
        .map(|genre| genre.name)
        .collect()
}

/// Runtime for movies, season count for TV
fn length_label<T: CatalogFields>(record: &T) -> Option<String> {
    let number = |name: &str| record.fields().get(name).and_then(Value::as_u64).filter(|n| *n > 0);
    if let Some(minutes) = number("runtime") {
        return Some(format!("{}h {:02}m", minutes / 60, minutes % 60));
    }
    number("number_of_seasons").map(|seasons| match seasons {
        1 => "1 season".to_string(),
        n => format!("{} seasons", n),
    })
}

fn top_cast<T: CatalogFields>(record: &T) -> Vec<CastMember> {
    record
        .fields()
        .get("credits")
        .cloned()
        .and_then(|value| serde_json::from_value::<Credits>(value).ok())
        .map(|credits| credits.cast.into_iter().take(CAST_LIMIT).collect())
        .unwrap_or_default()
}

/// Recommendations appended to a details response; they share the parent's
/// media type unless a record says otherwise
fn recommendations(item: &CatalogItem) -> Vec<CatalogItem> {
    let results = item
        .fields()
        .get("recommendations")
        .and_then(|block| block.get("results"))
        .and_then(Value::as_array);

    let Some(results) = results else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|value| {
            let mut value = value.clone();
            if let Some(object) = value.as_object_mut() {
                object
                    .entry("media_type")
                    .or_insert_with(|| Value::from(item.media_type().as_str()));
            }
            CatalogItem::from_value(value).ok()
        })
        .take(RECOMMENDATION_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinestream_models::CatalogRecord;

    fn details(media_type: MediaType, fields: Value) -> CatalogItem {
        let mut value = fields;
        value["id"] = json!(1);
        CatalogItem::with_media_type(media_type, serde_json::from_value::<CatalogRecord>(value).unwrap())
    }

    #[test]
    fn test_genre_names() {
        let item = details(
            MediaType::Movie,
            json!({"genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}]}),
        );
        assert_eq!(genre_names(&item), vec!["Drama", "Thriller"]);
        assert!(genre_names(&details(MediaType::Movie, json!({}))).is_empty());
    }

    #[test]
    fn test_length_label() {
        assert_eq!(
            length_label(&details(MediaType::Movie, json!({"runtime": 139}))).as_deref(),
            Some("2h 19m")
        );
        assert_eq!(
            length_label(&details(MediaType::Tv, json!({"number_of_seasons": 1}))).as_deref(),
            Some("1 season")
        );
        assert_eq!(length_label(&details(MediaType::Movie, json!({"runtime": 0}))), None);
    }

    #[test]
    fn test_top_cast_is_capped() {
        let cast: Vec<Value> = (0..12)
            .map(|i| json!({"name": format!("Actor {}", i), "character": "Role"}))
            .collect();
        let item = details(MediaType::Movie, json!({"credits": {"cast": cast}}));
        let top = top_cast(&item);
        assert_eq!(top.len(), CAST_LIMIT);
        assert_eq!(top[0].name, "Actor 0");
    }

    #[test]
    fn test_recommendations_inherit_media_type() {
        let item = details(
            MediaType::Tv,
            json!({"recommendations": {"results": [
                {"id": 66732, "name": "Stranger Things"},
                {"id": 550, "media_type": "movie", "title": "Fight Club"},
                {"name": "no id"}
            ]}}),
        );
        let recs = recommendations(&item);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].media_type(), MediaType::Tv);
        assert_eq!(recs[1].media_type(), MediaType::Movie);
    }

    #[test]
    fn test_category_titles() {
        assert_eq!(category_title(ListCategory::TopRated), "Top Rated");
        assert_eq!(plural(MediaType::Tv), "TV Series");
    }
}
