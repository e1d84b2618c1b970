use super::PageContext;
use crate::types::*;

pub const VIEWPORT: CheckMeta = CheckMeta::new("Viewport", Impact::High, Difficulty::Easy)
    .learn_more("https://developer.mozilla.org/en-US/docs/Web/HTML/Viewport_meta_tag");

pub fn run(ctx: &PageContext<'_>) -> Vec<CheckResult> {
    vec![check_viewport(ctx)]
}

pub fn check_viewport(ctx: &PageContext<'_>) -> CheckResult {
    let content = ctx.document.meta_name("viewport");
    let responsive = content.as_deref().is_some_and(|c| {
        c.to_ascii_lowercase()
            .replace(' ', "")
            .contains("width=device-width")
    });

    if responsive {
        VIEWPORT
            .result(true, 100, "Mobile viewport tag present.")
            .explain("The viewport tag tells browsers how to size and scale the page on mobile devices.")
            .fix("Mobile optimization is active.")
            .with_details(content)
    } else {
        VIEWPORT
            .result(false, 0, "Viewport tag missing/incorrect")
            .explain("Without a viewport tag, mobile browsers render the desktop layout and shrink it until it is unreadable.")
            .fix("Add this inside `<head>`:\n```html\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n```")
            .recommend("Add width=device-width viewport tag.")
            .with_details(content)
    }
}
