//! Login, logout and signup pages.
//!
//! ```text
//! GET  /auth/login/?next=/create/
//! POST /auth/login/   username=leo&password=...&next=/create/
//! GET  /auth/logout/
//! POST /auth/signup/  first_name=...&username=...&password1=...&password2=...
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::{
    ErrorCode, FieldErrors, FormOutcome, LoginCredentials, LoginValidationError, NewAccount,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::forms::{
    LoginEcho, LoginForm, NextQuery, SignupEcho, SignupForm, safe_next,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{base_context, form_errors, redirect};

const LOGIN_FIELDS: [&str; 2] = ["username", "password"];
const SIGNUP_FIELDS: [&str; 6] = [
    "first_name",
    "last_name",
    "username",
    "email",
    "password1",
    "password2",
];

/// Shown for unknown users and wrong passwords alike.
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

fn render_login(
    state: &HttpState,
    username: &str,
    next: &str,
    errors: &FieldErrors,
) -> ApiResult<HttpResponse> {
    let mut context = base_context(None);
    context.insert("form", &LoginEcho { username });
    context.insert("next", next);
    context.insert("errors", &form_errors(&LOGIN_FIELDS, errors));
    state.templates.page("users/login.html", &context)
}

fn login_field_errors(err: &LoginValidationError) -> FieldErrors {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    FieldErrors::single(field, "This field is required.")
}

#[get("/auth/login/")]
pub async fn login_form(
    state: web::Data<HttpState>,
    query: web::Query<NextQuery>,
) -> ApiResult<HttpResponse> {
    render_login(&state, "", &query.next, &FieldErrors::new())
}

/// Check credentials, start a session and continue to `next`.
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let credentials = match LoginCredentials::try_from_parts(&form.username, &form.password) {
        Ok(credentials) => credentials,
        Err(err) => {
            return render_login(&state, &form.username, &form.next, &login_field_errors(&err));
        }
    };
    let user_id = match state.login.authenticate(&credentials).await {
        Ok(user_id) => user_id,
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            let mut errors = FieldErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            return render_login(&state, &form.username, &form.next, &errors);
        }
        Err(err) => return Err(err),
    };
    session.persist_user(&user_id)?;
    info!(user = %user_id, "signed in");
    Ok(redirect(safe_next(&form.next)))
}

#[get("/auth/logout/")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    state
        .templates
        .page("users/logged_out.html", &base_context(None))
}

fn render_signup(
    state: &HttpState,
    form: &SignupForm,
    errors: &FieldErrors,
) -> ApiResult<HttpResponse> {
    let mut context = base_context(None);
    context.insert("form", &SignupEcho::from(form));
    context.insert("errors", &form_errors(&SIGNUP_FIELDS, errors));
    state.templates.page("users/signup.html", &context)
}

#[get("/auth/signup/")]
pub async fn signup_form(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    render_signup(&state, &SignupForm::default(), &FieldErrors::new())
}

/// Register an account and sign it in straight away.
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let account = match NewAccount::try_from_request(&form.as_request()) {
        Ok(account) => account,
        Err(errors) => return render_signup(&state, &form, &errors),
    };
    match state.signup.signup(&account).await? {
        FormOutcome::Saved(user) => {
            session.persist_user(user.id())?;
            Ok(redirect("/"))
        }
        FormOutcome::Invalid(errors) => render_signup(&state, &form, &errors),
    }
}
