//! NATS message handlers

pub mod bus;
pub mod driver;
pub mod ping;
pub mod place;
pub mod shift;

use anyhow::Result;
use async_nats::Client;
use sqlx::PgPool;
use tokio::select;
use tracing::{error, info};

/// Start all message handlers
pub async fn start_handlers(client: Client, pool: PgPool) -> Result<()> {
    info!("Starting message handlers...");

    // Subscribe to all subjects
    let ping_sub = client.subscribe("fleet.ping").await?;

    // Bus subjects
    let bus_create_sub = client.subscribe("fleet.bus.create").await?;
    let bus_list_sub = client.subscribe("fleet.bus.list").await?;
    let bus_update_sub = client.subscribe("fleet.bus.update").await?;
    let bus_delete_sub = client.subscribe("fleet.bus.delete").await?;

    // Driver subjects
    let driver_create_sub = client.subscribe("fleet.driver.create").await?;
    let driver_list_sub = client.subscribe("fleet.driver.list").await?;
    let driver_update_sub = client.subscribe("fleet.driver.update").await?;
    let driver_delete_sub = client.subscribe("fleet.driver.delete").await?;

    // Place subjects
    let place_create_sub = client.subscribe("fleet.place.create").await?;
    let place_list_sub = client.subscribe("fleet.place.list").await?;
    let place_update_sub = client.subscribe("fleet.place.update").await?;
    let place_delete_sub = client.subscribe("fleet.place.delete").await?;

    // Shift subjects
    let shift_save_sub = client.subscribe("fleet.shift.save").await?;
    let shift_validate_sub = client.subscribe("fleet.shift.validate").await?;
    let shift_list_sub = client.subscribe("fleet.shift.list").await?;
    let shift_get_sub = client.subscribe("fleet.shift.get").await?;
    let shift_delete_sub = client.subscribe("fleet.shift.delete").await?;

    info!("Subscribed to NATS subjects");

    // Clone for each handler
    let client_ping = client.clone();

    let client_bus_create = client.clone();
    let client_bus_list = client.clone();
    let client_bus_update = client.clone();
    let client_bus_delete = client.clone();

    let client_driver_create = client.clone();
    let client_driver_list = client.clone();
    let client_driver_update = client.clone();
    let client_driver_delete = client.clone();

    let client_place_create = client.clone();
    let client_place_list = client.clone();
    let client_place_update = client.clone();
    let client_place_delete = client.clone();

    let client_shift_save = client.clone();
    let client_shift_validate = client.clone();
    let client_shift_list = client.clone();
    let client_shift_get = client.clone();
    let client_shift_delete = client.clone();

    let pool_bus_create = pool.clone();
    let pool_bus_list = pool.clone();
    let pool_bus_update = pool.clone();
    let pool_bus_delete = pool.clone();

    let pool_driver_create = pool.clone();
    let pool_driver_list = pool.clone();
    let pool_driver_update = pool.clone();
    let pool_driver_delete = pool.clone();

    let pool_place_create = pool.clone();
    let pool_place_list = pool.clone();
    let pool_place_update = pool.clone();
    let pool_place_delete = pool.clone();

    let pool_shift_save = pool.clone();
    let pool_shift_validate = pool.clone();
    let pool_shift_list = pool.clone();
    let pool_shift_get = pool.clone();
    let pool_shift_delete = pool.clone();

    // Spawn handlers
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let bus_create_handle = tokio::spawn(async move {
        bus::handle_create(client_bus_create, bus_create_sub, pool_bus_create).await
    });

    let bus_list_handle = tokio::spawn(async move {
        bus::handle_list(client_bus_list, bus_list_sub, pool_bus_list).await
    });

    let bus_update_handle = tokio::spawn(async move {
        bus::handle_update(client_bus_update, bus_update_sub, pool_bus_update).await
    });

    let bus_delete_handle = tokio::spawn(async move {
        bus::handle_delete(client_bus_delete, bus_delete_sub, pool_bus_delete).await
    });

    let driver_create_handle = tokio::spawn(async move {
        driver::handle_create(client_driver_create, driver_create_sub, pool_driver_create).await
    });

    let driver_list_handle = tokio::spawn(async move {
        driver::handle_list(client_driver_list, driver_list_sub, pool_driver_list).await
    });

    let driver_update_handle = tokio::spawn(async move {
        driver::handle_update(client_driver_update, driver_update_sub, pool_driver_update).await
    });

    let driver_delete_handle = tokio::spawn(async move {
        driver::handle_delete(client_driver_delete, driver_delete_sub, pool_driver_delete).await
    });

    let place_create_handle = tokio::spawn(async move {
        place::handle_create(client_place_create, place_create_sub, pool_place_create).await
    });

    let place_list_handle = tokio::spawn(async move {
        place::handle_list(client_place_list, place_list_sub, pool_place_list).await
    });

    let place_update_handle = tokio::spawn(async move {
        place::handle_update(client_place_update, place_update_sub, pool_place_update).await
    });

    let place_delete_handle = tokio::spawn(async move {
        place::handle_delete(client_place_delete, place_delete_sub, pool_place_delete).await
    });

    let shift_save_handle = tokio::spawn(async move {
        shift::handle_save(client_shift_save, shift_save_sub, pool_shift_save).await
    });

    let shift_validate_handle = tokio::spawn(async move {
        shift::handle_validate(client_shift_validate, shift_validate_sub, pool_shift_validate).await
    });

    let shift_list_handle = tokio::spawn(async move {
        shift::handle_list(client_shift_list, shift_list_sub, pool_shift_list).await
    });

    let shift_get_handle = tokio::spawn(async move {
        shift::handle_get(client_shift_get, shift_get_sub, pool_shift_get).await
    });

    let shift_delete_handle = tokio::spawn(async move {
        shift::handle_delete(client_shift_delete, shift_delete_sub, pool_shift_delete).await
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which means an error occurred)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = bus_create_handle => {
            error!("Bus create handler finished: {:?}", result);
        }
        result = bus_list_handle => {
            error!("Bus list handler finished: {:?}", result);
        }
        result = bus_update_handle => {
            error!("Bus update handler finished: {:?}", result);
        }
        result = bus_delete_handle => {
            error!("Bus delete handler finished: {:?}", result);
        }
        result = driver_create_handle => {
            error!("Driver create handler finished: {:?}", result);
        }
        result = driver_list_handle => {
            error!("Driver list handler finished: {:?}", result);
        }
        result = driver_update_handle => {
            error!("Driver update handler finished: {:?}", result);
        }
        result = driver_delete_handle => {
            error!("Driver delete handler finished: {:?}", result);
        }
        result = place_create_handle => {
            error!("Place create handler finished: {:?}", result);
        }
        result = place_list_handle => {
            error!("Place list handler finished: {:?}", result);
        }
        result = place_update_handle => {
            error!("Place update handler finished: {:?}", result);
        }
        result = place_delete_handle => {
            error!("Place delete handler finished: {:?}", result);
        }
        result = shift_save_handle => {
            error!("Shift save handler finished: {:?}", result);
        }
        result = shift_validate_handle => {
            error!("Shift validate handler finished: {:?}", result);
        }
        result = shift_list_handle => {
            error!("Shift list handler finished: {:?}", result);
        }
        result = shift_get_handle => {
            error!("Shift get handler finished: {:?}", result);
        }
        result = shift_delete_handle => {
            error!("Shift delete handler finished: {:?}", result);
        }
    }

    Ok(())
}
