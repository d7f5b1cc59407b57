use anyhow::Result;
use fomo_core::repository::Repository;
use uuid::Uuid;

pub async fn delete_task(repo: &impl Repository, task_id: Uuid) -> Result<()> {
    repo.delete_task(task_id).await?;
    println!("Deleted task with ID: {}", task_id);
    Ok(())
}
