//! HTML rendering of the search page.

use crate::omdb::Movie;
use crate::search::{FormErrors, SearchCriteria};

/// Everything the search page shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageModel {
    pub criteria: SearchCriteria,
    pub errors: FormErrors,
    pub total_results: u64,
    pub movies: Vec<Movie>,
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(model: &PageModel) -> String {
    let cards: String = model.movies.iter().map(movie_card).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Movie Search</title>
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    {form}
    <div class="results">
        <div class="count">Found: {total} movies.</div>
        {cards}
    </div>
</body>
</html>"#,
        form = search_form(&model.criteria, &model.errors),
        total = model.total_results,
        cards = cards,
    )
}

fn search_form(criteria: &SearchCriteria, errors: &FormErrors) -> String {
    format!(
        r#"<form class="search" method="get" action="/">
        <label>Title <input name="title" value="{title}"></label>
        <label>Year <input name="year" type="number" value="{year}"></label>
        <a class="reset" href="/">Reset</a>
        <div class="errors">
            <span class="error">{title_error}</span>
            <span class="error">{year_error}</span>
        </div>
    </form>"#,
        title = html_escape(&criteria.title),
        year = html_escape(&criteria.year),
        title_error = errors.title.as_deref().map(html_escape).unwrap_or_default(),
        year_error = errors.year.as_deref().map(html_escape).unwrap_or_default(),
    )
}

fn movie_card(movie: &Movie) -> String {
    let year = if movie.year.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="year">Year: {}</div>"#, html_escape(&movie.year))
    };

    let poster = match movie.poster_url() {
        Some(url) => format!(
            r#"<img class="poster" src="{}" alt="{}" width="170" height="250">"#,
            html_escape(url),
            html_escape(&movie.title)
        ),
        None => r#"<div class="poster no-poster">No image</div>"#.to_string(),
    };

    format!(
        r#"
        <div class="card" id="{id}">
            <div class="info">
                <div class="title">{title}</div>
                <hr>
                {year}
            </div>
            {poster}
        </div>"#,
        id = html_escape(&movie.imdb_id),
        title = html_escape(&movie.title),
        year = year,
        poster = poster,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::NO_POSTER;

    fn movie(id: &str, title: &str, year: &str, poster: &str) -> Movie {
        Movie {
            imdb_id: id.into(),
            title: title.into(),
            year: year.into(),
            poster: poster.into(),
            ..Movie::default()
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_render_count_and_cards() {
        let model = PageModel {
            criteria: SearchCriteria::new("batman", "1989"),
            errors: FormErrors::default(),
            total_results: 42,
            movies: vec![
                movie("tt1", "Batman", "1989", "https://img/b.jpg"),
                movie("tt2", "Batman & Robin", "", NO_POSTER),
            ],
        };
        let html = render_page(&model);

        assert!(html.contains("Found: 42 movies."));
        assert!(html.contains(r#"value="batman""#));
        assert!(html.contains(r#"src="https://img/b.jpg""#));
        assert!(html.contains("Batman &amp; Robin"));
        assert!(html.contains("No image"));
        assert_eq!(html.matches("Year: ").count(), 1);
    }

    #[test]
    fn test_render_errors() {
        let model = PageModel {
            errors: FormErrors {
                title: Some("Enter title".into()),
                year: None,
            },
            ..PageModel::default()
        };
        let html = render_page(&model);
        assert!(html.contains("Enter title"));
        assert!(html.contains("Found: 0 movies."));
    }
}
