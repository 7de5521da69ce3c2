pub(crate) mod drive_chunks;
pub(crate) mod prepare_destination;
