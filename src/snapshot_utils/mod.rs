pub mod address_reencoder;
pub mod allocation_stats;
pub mod allocation_verification;
pub mod reward_allocator;
pub mod snapshot_assembler;
pub mod snapshot_merger;
