//! Container resolution
//!
//! A record is bound by numeric container id or by symbolic code. Ids are
//! taken as given (existence is not checked); codes go through the
//! container directory.

use crate::error::Result;
use crate::schema;
use crate::traits::{ContainerDirectory, ContainerQuery};
use tracing::{debug, warn};

use super::{ContainerId, ContainerRef};

/// Look up the id of the first container carrying `code`
///
/// Permission checks are skipped. The first match wins; its id must be a
/// plain digit string naming a positive id.
///
/// # Returns
///
/// - `Ok(Some(id))`: A container matched
/// - `Ok(None)`: Empty code, no match, or a match with an unusable id
/// - `Err(Error)`: The directory could not be queried
pub fn container_id_by_code(
    directory: &dyn ContainerDirectory,
    code: &str,
) -> Result<Option<ContainerId>> {
    if code.is_empty() {
        return Ok(None);
    }

    let containers = directory.list_containers(&ContainerQuery::by_code(code))?;
    let resolved = containers
        .first()
        .and_then(|container| schema::parse_id_literal(&container.id))
        .filter(|id| *id > 0);

    Ok(resolved)
}

/// Resolve a reference to a container id, never failing
///
/// Lookup errors are logged and leave the record unbound.
pub(crate) fn resolve(
    directory: &dyn ContainerDirectory,
    reference: &ContainerRef,
) -> Option<ContainerId> {
    let resolved = match reference {
        ContainerRef::Id(id) => u64::try_from(*id).ok().filter(|id| *id > 0),
        ContainerRef::Code(code) => match container_id_by_code(directory, code) {
            Ok(id) => id,
            Err(e) => {
                warn!("Container lookup for code {:?} failed: {}", code, e);
                None
            }
        },
    };

    match resolved {
        Some(id) => debug!("Resolved container {:?} to {}", reference, id),
        None => warn!("Container {:?} could not be resolved, record is unbound", reference),
    }

    resolved
}
