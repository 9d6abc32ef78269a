pub mod constants;
pub mod error;
pub mod evaluation;
pub mod pipeline;
#[cfg(test)]
pub mod test;
pub mod lstm {
    pub mod step_1_sequence_preparation;
    pub mod step_2_lstm_cell;
    pub mod step_3_model_arch;
    pub mod step_4_train_model;
    pub mod step_5_prediction;
}
pub mod util {
    pub mod feature_engineering;
    pub mod pre_processor;
    pub mod report;
    pub mod scaling;
}
