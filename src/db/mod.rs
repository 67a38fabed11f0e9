pub mod db;
pub mod referraldb;
pub mod signupdb;

#[cfg(test)]
pub mod mock_db;
