pub mod marking_record;
pub mod total_distance;
