#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::error;
use poem::error::InternalServerError;
use poem::{handler, web::Html, Result};
use tera::{Context, Tera};

// Server Utilities
use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Page metadata.  Static, carried over from the original application shell.
const PAGE_TITLE       : &str = "Home Page";
const PAGE_DESCRIPTION : &str = "Welcome to My Next.js App";

// Name under which the home template is registered.
const HOME_TEMPLATE    : &str = "home.html";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Register the compiled-in templates once.  A malformed template panics on
// first use, which is a fatal startup error.
lazy_static! {
    static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        match tera.add_raw_template(HOME_TEMPLATE, include_str!("../../templates/home.html")) {
            Ok(_) => (),
            Err(e) => {
                let s = format!("{}", Errors::TemplateRender(e.to_string()));
                panic!("{}", s);
            },
        };
        tera
    };
}

// ***************************************************************************
//                                 Handler
// ***************************************************************************
// ---------------------------------------------------------------------------
// home_page:
// ---------------------------------------------------------------------------
/** Serve the page that hosts the client-side greeting component.  The page
 * itself renders with an empty message; the embedded script fetches the
 * greeting endpoint and fills the message in after load.
 */
#[handler]
pub fn home_page() -> Result<Html<String>> {
    // Fill in the page metadata.
    let mut context = Context::new();
    context.insert("title", PAGE_TITLE);
    context.insert("description", PAGE_DESCRIPTION);

    // Render the page.
    match TEMPLATES.render(HOME_TEMPLATE, &context) {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            let msg = format!("{}", Errors::TemplateRender(e.to_string()));
            error!("{}", msg);
            Err(InternalServerError(e))
        },
    }
}
