use tabled::Table;

use crate::{
    error,
    management::RestoreOutcome,
    types::StatusTableRow,
    utils, warning,
};

pub async fn status() {
    let session = match super::open_session() {
        Ok(session) => session,
        Err(e) => error!("Cannot set up session: {}", e),
    };

    // report only, the next command that needs a token does the refresh
    let outcome = session.restore_passive().await;

    let RestoreOutcome::Restored { refresh_in } = outcome else {
        warning!("Not logged in. Run spotlyr login.");
        return;
    };

    let current = session.session().await;
    let mut rows = vec![StatusTableRow {
        field: "state".into(),
        value: session.state().to_string(),
    }];
    if let Some(token) = &current.access_token {
        rows.push(StatusTableRow {
            field: "access token".into(),
            value: format!("sha256:{}", utils::token_fingerprint(token)),
        });
    }
    if let Some(expires_in) = current.expires_in {
        rows.push(StatusTableRow {
            field: "expires in (issued)".into(),
            value: format!("{expires_in}s"),
        });
    }
    rows.push(StatusTableRow {
        field: "obtained at".into(),
        value: current
            .obtained_at
            .map(utils::format_timestamp)
            .unwrap_or_else(|| "unknown".into()),
    });
    rows.push(StatusTableRow {
        field: "refresh due".into(),
        value: if refresh_in.is_zero() {
            "now".into()
        } else {
            format!("in {}", utils::format_duration(refresh_in))
        },
    });

    println!("{}", Table::new(rows));
}
