//! HTML gallery page.
//!
//! Server-rendered with maud: a grid of thumbnails linking to the
//! originals, plus prev/next pagination. Styling is inlined so the page
//! works without a separate asset pipeline.

use maud::{html, Markup, DOCTYPE};
use pixwall_core::models::{ImageRecordView, Page};

const STYLE: &str = "
body { font-family: sans-serif; margin: 2rem; background: #fafafa; }
h1 { font-weight: 500; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
figure { margin: 0; background: #fff; border: 1px solid #e0e0e0; border-radius: 4px; padding: 0.5rem; }
figure img { width: 100%; height: 180px; object-fit: cover; border-radius: 2px; }
figcaption { font-size: 0.8rem; color: #555; padding-top: 0.4rem; word-break: break-all; }
.meta { color: #999; }
nav.pagination { margin-top: 1.5rem; display: flex; gap: 1rem; align-items: center; }
.empty { color: #777; margin-top: 2rem; }
";

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (STYLE) }
            }
            body { (body) }
        }
    }
}

pub fn gallery_page(page: &Page<ImageRecordView>) -> Markup {
    layout(
        "Gallery",
        html! {
            h1 { "Gallery" }
            @if page.items.is_empty() {
                p.empty { "No images uploaded yet." }
            } @else {
                div.grid {
                    @for image in &page.items {
                        figure {
                            a href=(image.url) {
                                img src=(image.thumbnail_url) alt=(image.original_filename) loading="lazy";
                            }
                            figcaption {
                                (image.original_filename)
                                br;
                                span.meta { (image.filesize) " - " (image.upload_date) }
                            }
                        }
                    }
                }
                (pagination(page.page, page.total_pages))
            }
        },
    )
}

pub fn error_page(message: &str) -> Markup {
    layout(
        "Gallery",
        html! {
            h1 { "Gallery" }
            p.empty { (message) }
        },
    )
}

fn pagination(page: u32, total_pages: u32) -> Markup {
    html! {
        nav.pagination {
            @if page > 1 {
                a href=(format!("/gallery?page={}", page - 1)) { "Previous" }
            }
            span { "Page " (page) " of " (total_pages) }
            @if page < total_pages {
                a href=(format!("/gallery?page={}", page + 1)) { "Next" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: i64) -> ImageRecordView {
        ImageRecordView {
            id,
            filename: format!("aaaa_pic{}.jpg", id),
            original_filename: format!("pic{}.jpg", id),
            url: format!("http://localhost:5000/static/uploads/aaaa_pic{}.jpg", id),
            thumbnail_url: format!(
                "http://localhost:5000/static/uploads/thumbnails/aaaa_pic{}.jpg",
                id
            ),
            filesize: "12.3KB".to_string(),
            filetype: "image/jpeg".to_string(),
            upload_date: "2026-03-14 15:09:26".to_string(),
        }
    }

    #[test]
    fn test_gallery_page_renders_thumbnails() {
        let page = Page::new(vec![view(1), view(2)], 1, 18, 2);
        let rendered = gallery_page(&page).into_string();
        assert!(rendered.contains("thumbnails/aaaa_pic1.jpg"));
        assert!(rendered.contains("href=\"http://localhost:5000/static/uploads/aaaa_pic2.jpg\""));
        assert!(rendered.contains("Page 1 of 1"));
        assert!(!rendered.contains("Previous"));
        assert!(!rendered.contains("Next"));
    }

    #[test]
    fn test_gallery_page_pagination_links() {
        let items: Vec<_> = (1..=18).map(view).collect();
        let page = Page::new(items, 2, 18, 54);
        let rendered = gallery_page(&page).into_string();
        assert!(rendered.contains("/gallery?page=1"));
        assert!(rendered.contains("/gallery?page=3"));
        assert!(rendered.contains("Page 2 of 3"));
    }

    #[test]
    fn test_empty_gallery() {
        let page: Page<ImageRecordView> = Page::new(vec![], 1, 18, 0);
        let rendered = gallery_page(&page).into_string();
        assert!(rendered.contains("No images uploaded yet."));
    }

    #[test]
    fn test_error_page() {
        let rendered = error_page("Failed to load gallery").into_string();
        assert!(rendered.contains("Failed to load gallery"));
    }
}
