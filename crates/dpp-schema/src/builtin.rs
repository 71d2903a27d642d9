//! Built-in mapper registration

use crate::registry::{SchemaRegistry, factory_of};
use dpp_mapping::{EclassMapper, Isa95Mapper};
use tracing::info;

/// Register the ECLASS and ISA-95 mappers, resolved on first use.
pub fn register_builtin_mappers(registry: &mut SchemaRegistry) {
    registry.register_lazy(
        "ECLASS",
        || Ok(factory_of::<EclassMapper>()),
        &["eclass", "EC"],
    );
    registry.register_lazy(
        "ISA-95",
        || Ok(factory_of::<Isa95Mapper>()),
        &["ISA95", "isa95", "IEC62264"],
    );
    info!("Built-in mappers registered");
}
