//! Mock-server tests for the service clients

mod anthropic_mock_tests;
mod elevenlabs_mock_tests;
mod galileo_mock_tests;
mod github_mock_tests;
