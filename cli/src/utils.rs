use bids_tasks_core::api::{CliError, OutputEntities, OutputQueries, QueryFilter};

/// Parse `NAME=ENTITY` flags into ordered extra outputs.
pub fn parse_entity_args(raw: &[String]) -> Result<OutputEntities, CliError> {
    raw.iter()
        .map(|arg| {
            let (name, entity) = arg.split_once('=').ok_or_else(|| {
                CliError::Command(format!("invalid --entity '{arg}' (expected NAME=ENTITY)"))
            })?;
            Ok((name.trim().to_string(), entity.trim().to_string()))
        })
        .collect::<Result<Vec<_>, CliError>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Parse `NAME=SUFFIX[:EXT[,EXT...]]` flags into ordered named queries.
pub fn parse_query_args(raw: &[String]) -> Result<OutputQueries, CliError> {
    let mut queries = OutputQueries::empty();
    for arg in raw {
        let (name, criteria) = arg.split_once('=').ok_or_else(|| {
            CliError::Command(format!(
                "invalid --query '{arg}' (expected NAME=SUFFIX[:EXT,...])"
            ))
        })?;
        let (suffix, extensions) = match criteria.split_once(':') {
            Some((suffix, exts)) => (suffix, exts),
            None => (criteria, ""),
        };
        let suffix = suffix.trim();
        if suffix.is_empty() {
            return Err(CliError::Command(format!(
                "invalid --query '{arg}' (empty suffix)"
            )));
        }
        let extensions = extensions
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty());
        queries = queries.with(name.trim(), QueryFilter::new(suffix, extensions));
    }
    Ok(queries)
}
