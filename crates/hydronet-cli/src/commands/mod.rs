pub mod disorder;
