use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::app_database;
use crate::models::blog::{Blog, BlogCategory};
use crate::services::image_service::StagedImage;
use crate::services::image_service::ImageStores;

const MAX_BLOG_IMAGES: usize = 10;

/// Multipart payload for blog writes. `imagesToDelete` is a JSON array of
/// indices into the stored image list; `newImages` carries up to ten files.
#[derive(Debug, MultipartForm)]
pub struct BlogForm {
    pub title: Option<Text<String>>,
    pub content: Option<Text<String>>,
    pub author: Option<Text<String>>,
    pub category: Option<Text<String>>,
    #[multipart(rename = "imagesToDelete")]
    pub images_to_delete: Option<Text<String>>,
    #[multipart(rename = "newImages", limit = "10MB")]
    pub new_images: Vec<TempFile>,
}

#[derive(Debug, Deserialize)]
pub struct RatingInput {
    pub rating: Option<i32>,
}

fn text_field(field: &Option<Text<String>>) -> String {
    field.as_ref().map(|t| t.trim().to_string()).unwrap_or_default()
}

/// Field checks shared by add and update; both require the full payload.
fn validate_blog_fields(
    title: &str,
    content: &str,
    author: &str,
    category: &str,
) -> Result<BlogCategory, HttpResponse> {
    if title.is_empty() || content.is_empty() || author.is_empty() || category.is_empty() {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "All fields (title, content, author, category) are required"
        })));
    }
    let title_len = title.chars().count();
    if !(5..=100).contains(&title_len) {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Title must be between 5 and 100 characters"
        })));
    }
    if content.chars().count() < 5 {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Content must be at least 5 characters long"
        })));
    }
    match BlogCategory::parse(category) {
        Some(parsed) => Ok(parsed),
        None => Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Category must be one of rooms, tasks, general"
        }))),
    }
}

fn stage_new_images(
    form_files: &[TempFile],
    stores: &ImageStores,
) -> Result<Vec<StagedImage>, HttpResponse> {
    if form_files.len() > MAX_BLOG_IMAGES {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "A maximum of 10 images is allowed"
        })));
    }

    let mut staged = Vec::with_capacity(form_files.len());
    for file in form_files {
        match stores.blogs.stage(file) {
            Ok(image) => staged.push(image),
            Err(e) => {
                // Earlier stages roll back when `staged` drops here.
                eprintln!("Failed to store blog image: {}", e);
                return Err(HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                })));
            }
        }
    }
    Ok(staged)
}

pub async fn add_blog(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    form: MultipartForm<BlogForm>,
) -> impl Responder {
    let client = data.into_inner();
    let form = form.into_inner();

    let title = text_field(&form.title);
    let content = text_field(&form.content);
    let author = text_field(&form.author);
    let category_text = text_field(&form.category);

    let category = match validate_blog_fields(&title, &content, &author, &category_text) {
        Ok(category) => category,
        Err(rejection) => return rejection,
    };

    let staged = match stage_new_images(&form.new_images, &stores) {
        Ok(staged) => staged,
        Err(rejection) => return rejection,
    };

    let mut blog = Blog {
        id: None,
        title,
        content,
        author,
        images: staged.iter().map(|s| s.file_name().to_string()).collect(),
        category,
        rating: 0.0,
        rating_count: 0,
        created_at: Utc::now(),
    };

    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    match collection.insert_one(&blog).await {
        Ok(insert_result) => {
            for image in staged {
                image.commit();
            }
            blog.id = insert_result.inserted_id.as_object_id();
            HttpResponse::Ok().json(blog)
        }
        Err(err) => {
            eprintln!("Failed to add blog: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to add blog: {}", err)
            }))
        }
    }
}

pub async fn get_blogs(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Blog>>().await {
            Ok(blogs) => HttpResponse::Ok().json(blogs),
            Err(err) => {
                eprintln!("Failed to collect blogs: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to fetch blogs: {}", err)
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find blogs: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blogs: {}", err)
            }))
        }
    }
}

pub async fn get_blogs_by_category(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let category = path.into_inner();
    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    match collection.find(doc! { "category": category.as_str() }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Blog>>().await {
            Ok(blogs) => {
                if blogs.is_empty() {
                    return HttpResponse::NotFound().json(serde_json::json!({
                        "message": format!("No blogs found for category: {}", category)
                    }));
                }
                HttpResponse::Ok().json(blogs)
            }
            Err(err) => {
                eprintln!("Failed to collect blogs: {:?}", err);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to fetch blogs: {}", err)
                }))
            }
        },
        Err(err) => {
            eprintln!("Failed to find blogs: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blogs: {}", err)
            }))
        }
    }
}

pub async fn get_blog(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let client = data.into_inner();
    let blog_id = path.into_inner();

    let blog_object_id = match ObjectId::parse_str(&blog_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid blog ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid blog ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    match collection.find_one(doc! { "_id": blog_object_id }).await {
        Ok(Some(blog)) => HttpResponse::Ok().json(blog),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Blog post not found"
        })),
        Err(e) => {
            eprintln!("Error fetching blog: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blog: {}", e)
            }))
        }
    }
}

pub async fn update_blog(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
    form: MultipartForm<BlogForm>,
) -> impl Responder {
    let client = data.into_inner();
    let blog_id = path.into_inner();
    let form = form.into_inner();

    let blog_object_id = match ObjectId::parse_str(&blog_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid blog ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid blog ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    let filter = doc! { "_id": blog_object_id };

    let existing = match collection.find_one(filter.clone()).await {
        Ok(Some(blog)) => blog,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Blog post not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching blog: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update blog: {}", e)
            }));
        }
    };

    let title = text_field(&form.title);
    let content = text_field(&form.content);
    let author = text_field(&form.author);
    let category = text_field(&form.category);

    if let Err(rejection) = validate_blog_fields(&title, &content, &author, &category) {
        return rejection;
    }

    let delete_indices: Vec<i64> = match form.images_to_delete.as_deref() {
        Some(raw) if !raw.trim().is_empty() => match serde_json::from_str(raw.trim()) {
            Ok(indices) => indices,
            Err(e) => {
                eprintln!("Invalid imagesToDelete payload: {:?}", e);
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid imagesToDelete format"
                }));
            }
        },
        _ => Vec::new(),
    };

    // Split the stored list into survivors and files to drop once the
    // write sticks. Out-of-range indices are ignored.
    let mut kept_images = Vec::new();
    let mut removed_images = Vec::new();
    for (index, image) in existing.images.iter().enumerate() {
        if delete_indices.contains(&(index as i64)) {
            removed_images.push(image.clone());
        } else {
            kept_images.push(image.clone());
        }
    }

    let staged = match stage_new_images(&form.new_images, &stores) {
        Ok(staged) => staged,
        Err(rejection) => return rejection,
    };

    let mut final_images = kept_images;
    final_images.extend(staged.iter().map(|s| s.file_name().to_string()));

    let update = doc! { "$set": {
        "title": title.as_str(),
        "content": content.as_str(),
        "author": author.as_str(),
        "category": category.as_str(),
        "images": final_images,
    }};

    match collection.update_one(filter.clone(), update).await {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Blog post not found"
                }));
            }

            for image in staged {
                image.commit();
            }
            for image in &removed_images {
                stores.blogs.remove(image);
            }

            match collection.find_one(filter).await {
                Ok(Some(blog)) => HttpResponse::Ok().json(serde_json::json!({
                    "message": "Blog post updated successfully",
                    "blog": blog
                })),
                Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
                    "message": "Blog post not found"
                })),
                Err(err) => {
                    eprintln!("Failed to reload blog: {:?}", err);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": format!("Failed to update blog: {}", err)
                    }))
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to update blog: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update blog: {}", err)
            }))
        }
    }
}

pub async fn delete_blog(
    data: web::Data<Arc<Client>>,
    stores: web::Data<ImageStores>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let blog_id = path.into_inner();

    let blog_object_id = match ObjectId::parse_str(&blog_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid blog ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid blog ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    let existing = match collection.find_one(doc! { "_id": blog_object_id }).await {
        Ok(Some(blog)) => blog,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Blog post not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching blog: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to delete blog: {}", e)
            }));
        }
    };

    for image in &existing.images {
        stores.blogs.remove(image);
    }

    match collection.delete_one(doc! { "_id": blog_object_id }).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Blog post deleted successfully"
        })),
        Err(err) => {
            eprintln!("Failed to delete blog: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to delete blog: {}", err)
            }))
        }
    }
}

pub async fn rate_blog(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<RatingInput>,
) -> impl Responder {
    let client = data.into_inner();
    let blog_id = path.into_inner();

    // Range check first; it applies regardless of whether the id resolves.
    let rating = match input.rating {
        Some(rating) if (1..=5).contains(&rating) => rating,
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Rating must be between 1 and 5"
            }));
        }
    };

    let blog_object_id = match ObjectId::parse_str(&blog_id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Invalid blog ID format: {:?}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid blog ID format"
            }));
        }
    };

    let collection: mongodb::Collection<Blog> = app_database(&client).collection("blogs");

    let filter = doc! { "_id": blog_object_id };

    let mut blog = match collection.find_one(filter.clone()).await {
        Ok(Some(blog)) => blog,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Blog not found"
            }));
        }
        Err(e) => {
            eprintln!("Error fetching blog: {:?}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to submit rating: {}", e)
            }));
        }
    };

    let new_rating = blog.rating_after(rating);

    let update = doc! { "$set": {
        "rating": new_rating,
        "ratingCount": blog.rating_count + 1,
    }};

    match collection.update_one(filter, update).await {
        Ok(_) => {
            blog.rating = new_rating;
            blog.rating_count += 1;
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Rating submitted successfully",
                "blog": blog
            }))
        }
        Err(err) => {
            eprintln!("Failed to submit rating: {:?}", err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to submit rating: {}", err)
            }))
        }
    }
}
